use crate::constants;
use crate::error::Result;
use async_trait::async_trait;
use tracing::debug;

/// Transport seam for the crawlers. Integration tests substitute a canned
/// implementation so parsing and orchestration run without the network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page and return its body as text. Non-2xx statuses are
    /// errors.
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// Production fetcher backed by reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, constants::USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Ok(body)
    }
}
