use crate::apis::firm_detail::FirmDetailCrawler;
use crate::apis::firm_list::FirmListCrawler;
use crate::config::ScraperConfig;
use crate::constants;
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::queue::WorkQueue;
use crate::types::{registry_order, Firm};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Result of a complete scrape run.
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub session: i32,
    pub total_firms: usize,
    pub detailed_firms: usize,
    pub errors: Vec<String>,
    pub output_file: Option<String>,
}

/// Drives the two-phase crawl: enumerate firms across the index pages,
/// then fetch per-firm financial detail. Each phase fully drains before
/// the next starts.
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    config: ScraperConfig,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: ScraperConfig) -> Self {
        Self { fetcher, config }
    }

    #[instrument(skip(self))]
    pub async fn run(&self, session: i32) -> Result<PipelineResult> {
        info!("Scraping the {}-{} legislative session", session, session + 1);
        let mut errors = Vec::new();

        let mut firms = self.list_firms(session, &mut errors).await;
        if firms.is_empty() {
            warn!("Found zero lobbying firms - not saving anything");
            return Ok(PipelineResult {
                session,
                total_firms: 0,
                detailed_firms: 0,
                errors,
                output_file: None,
            });
        }
        info!(
            "Listed {} firms across {} index pages",
            firms.len(),
            constants::INDEX_LETTERS.len()
        );

        let detailed_firms = self.detail_firms(&mut firms, session, &mut errors).await;

        info!("Sorting");
        firms.sort_by(registry_order);

        let file_name = format!("lobbying-firms-financial-activity-{}.json", session);
        fs::create_dir_all(&self.config.output_dir)?;
        let path = Path::new(&self.config.output_dir).join(&file_name);
        info!("Saving {} firms to {}", firms.len(), path.display());
        fs::write(&path, serde_json::to_string_pretty(&firms)?)?;

        Ok(PipelineResult {
            session,
            total_firms: firms.len(),
            detailed_firms,
            errors,
            output_file: Some(path.display().to_string()),
        })
    }

    /// Phase 1: enumerate firms across the index pages. A failing letter
    /// is recorded and the remaining letters still run.
    async fn list_firms(&self, session: i32, errors: &mut Vec<String>) -> Vec<Firm> {
        let mut queue = WorkQueue::new(self.config.concurrency);
        for letter in constants::INDEX_LETTERS.chars() {
            let crawler = FirmListCrawler::new(Arc::clone(&self.fetcher));
            queue.spawn(async move { (letter, crawler.fetch_letter(letter, session).await) });
        }

        let mut firms = Vec::new();
        for (letter, outcome) in queue.settle().await {
            match outcome {
                Ok(batch) => firms.extend(batch),
                Err(e) => {
                    error!("Error listing firms under '{}': {}", letter, e);
                    errors.push(format!("letter {}: {}", letter, e));
                }
            }
        }
        firms
    }

    /// Phase 2: fetch financial activity per firm. A failing firm keeps
    /// its empty collections and the run continues.
    async fn detail_firms(
        &self,
        firms: &mut [Firm],
        session: i32,
        errors: &mut Vec<String>,
    ) -> usize {
        let mut queue = WorkQueue::new(self.config.concurrency);
        for (index, firm) in firms.iter().enumerate() {
            let Some(id) = firm.id.clone() else {
                continue;
            };
            let crawler = FirmDetailCrawler::new(Arc::clone(&self.fetcher));
            queue.spawn(async move { (index, crawler.fetch_activity(&id, session).await) });
        }

        let mut detailed = 0;
        for (index, outcome) in queue.settle().await {
            match outcome {
                Ok(activity) => {
                    firms[index].attach_activity(activity);
                    detailed += 1;
                }
                Err(e) => {
                    let id = firms[index].id.as_deref().unwrap_or("?");
                    error!("Error scraping financial activity for {}: {}", id, e);
                    errors.push(format!("firm {}: {}", id, e));
                }
            }
        }
        detailed
    }
}
