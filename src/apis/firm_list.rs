use crate::constants::listing_url;
use crate::error::{Result, ScraperError};
use crate::fetch::PageFetcher;
use crate::parser::{self, FIRM_LISTING};
use crate::types::Firm;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{info, instrument};

static FIRM_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Crawls one listing page of the alphabetic firm index.
pub struct FirmListCrawler {
    fetcher: Arc<dyn PageFetcher>,
}

impl FirmListCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    #[instrument(skip(self))]
    pub async fn fetch_letter(&self, letter: char, session: i32) -> Result<Vec<Firm>> {
        info!("Scraping lobbying firms for {}", letter);
        let html = self.fetcher.get_text(&listing_url(letter, session)).await?;
        parse_listing(&html)
    }
}

/// Extract firm identity records from a listing page. Each data row names
/// the firm in its first cell, whose anchor carries the site-assigned id
/// as an `id=` query parameter.
pub fn parse_listing(html: &str) -> Result<Vec<Firm>> {
    let document = Html::parse_document(html);
    let rows = parser::data_rows(&document, &FIRM_LISTING)?;

    let mut firms = Vec::new();
    for row in rows {
        let name_cell = parser::cell(&row, 0, &FIRM_LISTING)?;
        let name = name_cell.text().collect::<String>().trim().to_string();
        let href = name_cell
            .select(&FIRM_LINK)
            .next()
            .and_then(|link| link.value().attr("href"))
            .ok_or_else(|| ScraperError::Structure {
                message: format!("firm row '{}' has no detail link", name),
            })?;
        firms.push(Firm::from_listing(firm_id_from_href(href)?, name));
    }
    Ok(firms)
}

/// The registry links every firm through `Detail.aspx?id=<id>&...`.
fn firm_id_from_href(href: &str) -> Result<String> {
    let (_, rest) = href
        .split_once("id=")
        .ok_or_else(|| ScraperError::MissingField(format!("id parameter in '{}'", href)))?;
    let id = match rest.split_once('&') {
        Some((id, _)) => id,
        None => rest,
    };
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_up_to_the_next_query_parameter() {
        assert_eq!(
            firm_id_from_href("/Lobbying/Firms/Detail.aspx?id=1145479&session=2023").unwrap(),
            "1145479"
        );
        assert_eq!(firm_id_from_href("Detail.aspx?id=42").unwrap(), "42");
    }

    #[test]
    fn href_without_id_is_a_missing_field() {
        let err = firm_id_from_href("/Lobbying/Firms/Detail.aspx?session=2023").unwrap_err();
        assert!(matches!(err, ScraperError::MissingField(_)));
    }
}
