use crate::constants::detail_url;
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::parser::{self, CLIENT_TABLE, PAYMENT_TABLE};
use crate::types::{Client, FirmActivity, Quarter};
use scraper::Html;
use std::sync::Arc;
use tracing::{info, instrument};

/// Crawls the financial activity view of one firm's detail page.
pub struct FirmDetailCrawler {
    fetcher: Arc<dyn PageFetcher>,
}

impl FirmDetailCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    #[instrument(skip(self))]
    pub async fn fetch_activity(&self, id: &str, session: i32) -> Result<FirmActivity> {
        info!("Scraping financial activity for firm {}", id);
        let html = self.fetcher.get_text(&detail_url(id, session)).await?;
        parse_activity(&html, id)
    }
}

/// Extract client payments and quarterly totals from a detail page. The
/// activity view renders a fixed sequence of tables; a page without the
/// clients table means the firm reported no activity for the session,
/// which is distinct from a layout change.
pub fn parse_activity(html: &str, id: &str) -> Result<FirmActivity> {
    let document = Html::parse_document(html);

    if parser::find_table(&document, &CLIENT_TABLE).is_none() {
        info!("No lobbying activity for firm {}", id);
        return Ok(FirmActivity::default());
    }

    let mut clients = Vec::new();
    for row in parser::data_rows(&document, &CLIENT_TABLE)? {
        let name = parser::cell_text(&row, 0, &CLIENT_TABLE)?;
        let amount = parser::parse_amount(&parser::cell_text(&row, 2, &CLIENT_TABLE)?);
        clients.push(Client { name: Some(name), amount });
    }

    let mut quarters = Vec::new();
    for row in parser::data_rows(&document, &PAYMENT_TABLE)? {
        let label = parser::cell_text(&row, 0, &PAYMENT_TABLE)?;
        let (session, quarter) = parser::split_session_quarter(&label);
        let amount = parser::parse_amount(&parser::cell_text(&row, 1, &PAYMENT_TABLE)?);
        quarters.push(Quarter { session, quarter, amount });
    }

    Ok(FirmActivity { clients, quarters })
}
