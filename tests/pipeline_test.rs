use anyhow::Result;
use async_trait::async_trait;
use calaccess_scraper::config::ScraperConfig;
use calaccess_scraper::constants::{detail_url, listing_url, INDEX_LETTERS};
use calaccess_scraper::error::{Result as ScrapeResult, ScraperError};
use calaccess_scraper::fetch::PageFetcher;
use calaccess_scraper::pipeline::Pipeline;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const SESSION: i32 = 2023;

/// Serves canned pages by URL; anything unregistered fails like a dead
/// page would.
struct CannedFetcher {
    pages: HashMap<String, String>,
}

#[async_trait]
impl PageFetcher for CannedFetcher {
    async fn get_text(&self, url: &str) -> ScrapeResult<String> {
        self.pages.get(url).cloned().ok_or_else(|| ScraperError::Structure {
            message: format!("no canned page for {}", url),
        })
    }
}

fn listing_with(rows: &[(&str, &str)]) -> String {
    let mut body = String::from("<tr><td>FIRM NAME</td><td>CITY</td></tr>");
    for (id, name) in rows {
        body.push_str(&format!(
            "<tr><td><a href=\"/Lobbying/Firms/Detail.aspx?id={}&amp;session=2023\">{}</a></td><td>SACRAMENTO</td></tr>",
            id, name
        ));
    }
    format!(
        "<html><body><table id=\"firms\"><tbody>{}</tbody></table></body></html>",
        body
    )
}

fn activity_page(clients: &[(&str, &str)], quarters: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for i in 0..6 {
        body.push_str(&format!(
            "<table><tbody><tr><td>chrome {}</td></tr></tbody></table>",
            i
        ));
    }
    body.push_str("<table><tbody><tr><td>PAYMENTS RECEIVED</td><td></td></tr><tr><td>PERIOD</td><td>AMOUNT</td></tr>");
    for (label, amount) in quarters {
        body.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>", label, amount));
    }
    body.push_str("</tbody></table>");
    body.push_str("<table><tbody><tr><td>CLIENTS</td><td></td><td></td></tr><tr><td>NAME</td><td>PERIOD</td><td>TOTAL</td></tr>");
    for (name, amount) in clients {
        body.push_str(&format!(
            "<tr><td>{}</td><td>2023</td><td>{}</td></tr>",
            name, amount
        ));
    }
    body.push_str("</tbody></table>");
    format!("<html><body>{}</body></html>", body)
}

/// Listing pages for every index character, all empty unless overridden.
fn empty_index() -> HashMap<String, String> {
    INDEX_LETTERS
        .chars()
        .map(|letter| (listing_url(letter, SESSION), listing_with(&[])))
        .collect()
}

fn test_config(output_dir: &std::path::Path) -> ScraperConfig {
    ScraperConfig {
        concurrency: 4,
        output_dir: output_dir.to_str().unwrap().to_string(),
    }
}

#[tokio::test]
async fn scrape_writes_the_expected_firm_file() -> Result<()> {
    let dir = tempdir()?;
    let mut pages = empty_index();
    pages.insert(
        listing_url('A', SESSION),
        listing_with(&[("100", "Acme Lobbying")]),
    );
    pages.insert(
        detail_url("100", SESSION),
        activity_page(
            &[("Beta Corp", "$5,000.00")],
            &[("2023, QUARTER 1", "$2,500.00")],
        ),
    );

    let pipeline = Pipeline::new(Arc::new(CannedFetcher { pages }), test_config(dir.path()));
    let result = pipeline.run(SESSION).await?;

    assert_eq!(result.total_firms, 1);
    assert_eq!(result.detailed_firms, 1);
    assert!(result.errors.is_empty());

    let path = dir.path().join("lobbying-firms-financial-activity-2023.json");
    assert_eq!(result.output_file.as_deref(), path.to_str());
    let content = std::fs::read_to_string(&path)?;
    // Pretty-printed with 2-space indentation
    assert!(content.starts_with("[\n  {"));

    let firms: Value = serde_json::from_str(&content)?;
    assert_eq!(
        firms,
        json!([{
            "id": "100",
            "name": "Acme Lobbying",
            "clients": [{ "name": "Beta Corp", "amount": 5000.0 }],
            "quarters": [{ "session": "2023", "quarter": "1", "amount": 2500.0 }]
        }])
    );
    Ok(())
}

#[tokio::test]
async fn detail_failure_keeps_the_firm_with_empty_collections() -> Result<()> {
    let dir = tempdir()?;
    let mut pages = empty_index();
    pages.insert(
        listing_url('A', SESSION),
        listing_with(&[("300", "Zulu Group"), ("100", "Acme Lobbying")]),
    );
    // Quarters and clients arrive out of order; no detail page for 300.
    pages.insert(
        detail_url("100", SESSION),
        activity_page(
            &[("Zeta LLC", "$1.00"), ("Beta Corp", "$2.00")],
            &[("2023, QUARTER 2", "$10.00"), ("2023, QUARTER 1", "$20.00")],
        ),
    );

    let pipeline = Pipeline::new(Arc::new(CannedFetcher { pages }), test_config(dir.path()));
    let result = pipeline.run(SESSION).await?;

    assert_eq!(result.total_firms, 2);
    assert_eq!(result.detailed_firms, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("firm 300"));

    let content =
        std::fs::read_to_string(dir.path().join("lobbying-firms-financial-activity-2023.json"))?;
    let firms: Value = serde_json::from_str(&content)?;

    // Master list sorted by (name, id) regardless of listing order
    assert_eq!(firms[0]["name"], "Acme Lobbying");
    assert_eq!(firms[1]["name"], "Zulu Group");

    // Attached collections are sorted
    assert_eq!(firms[0]["clients"][0]["name"], "Beta Corp");
    assert_eq!(firms[0]["clients"][1]["name"], "Zeta LLC");
    assert_eq!(firms[0]["quarters"][0]["quarter"], "1");
    assert_eq!(firms[0]["quarters"][1]["quarter"], "2");

    // The failed firm still appears, with empty collections
    assert_eq!(firms[1]["id"], "300");
    assert_eq!(firms[1]["clients"], json!([]));
    assert_eq!(firms[1]["quarters"], json!([]));
    Ok(())
}

#[tokio::test]
async fn letter_failures_are_contained_to_their_letter() -> Result<()> {
    let dir = tempdir()?;
    // Only 'A' resolves; every other index page errors.
    let mut pages = HashMap::new();
    pages.insert(
        listing_url('A', SESSION),
        listing_with(&[("100", "Acme Lobbying")]),
    );
    pages.insert(
        detail_url("100", SESSION),
        activity_page(&[("Beta Corp", "$5,000.00")], &[("2023, QUARTER 1", "$2,500.00")]),
    );

    let pipeline = Pipeline::new(Arc::new(CannedFetcher { pages }), test_config(dir.path()));
    let result = pipeline.run(SESSION).await?;

    assert_eq!(result.total_firms, 1);
    assert_eq!(result.errors.len(), INDEX_LETTERS.len() - 1);
    assert!(result.output_file.is_some());
    Ok(())
}

#[tokio::test]
async fn zero_firms_writes_no_output_file() -> Result<()> {
    let dir = tempdir()?;
    let pipeline = Pipeline::new(
        Arc::new(CannedFetcher { pages: empty_index() }),
        test_config(dir.path()),
    );
    let result = pipeline.run(SESSION).await?;

    assert_eq!(result.total_firms, 0);
    assert!(result.output_file.is_none());
    assert!(result.errors.is_empty());
    assert!(!dir
        .path()
        .join("lobbying-firms-financial-activity-2023.json")
        .exists());
    Ok(())
}

/// Tracks how many fetches are in flight at once.
struct CountingFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn get_text(&self, _url: &str) -> ScrapeResult<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(15)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(listing_with(&[]))
    }
}

#[tokio::test]
async fn fetches_never_exceed_the_concurrency_cap() -> Result<()> {
    let dir = tempdir()?;
    let fetcher = Arc::new(CountingFetcher {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let pipeline = Pipeline::new(fetcher.clone(), test_config(dir.path()));
    pipeline.run(SESSION).await?;

    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 4, "peak in-flight fetches was {}", peak);
    Ok(())
}
