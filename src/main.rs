use clap::Parser;
use std::sync::Arc;

use calaccess_scraper::config::Config;
use calaccess_scraper::constants;
use calaccess_scraper::fetch::{HttpFetcher, PageFetcher};
use calaccess_scraper::logging;
use calaccess_scraper::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "calaccess_scraper")]
#[command(about = "CAL-ACCESS lobbying firm financial activity scraper")]
#[command(version = "0.1.0")]
struct Cli {
    /// Legislative session to scrape, referenced by its starting year
    #[arg(long, default_value_t = constants::DEFAULT_SESSION)]
    session: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    println!("🔄 Scraping the {}-{} session...", cli.session, cli.session + 1);

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new());
    let pipeline = Pipeline::new(fetcher, config.scraper);
    let result = pipeline.run(cli.session).await?;

    println!("\n📊 Scrape results for the {}-{} session:", result.session, result.session + 1);
    println!("   Firms listed: {}", result.total_firms);
    println!("   Firms with financial detail: {}", result.detailed_firms);
    println!("   Errors: {}", result.errors.len());
    match &result.output_file {
        Some(file) => println!("   Output file: {}", file),
        None => println!("   Found zero lobbying firms - nothing was saved"),
    }

    if !result.errors.is_empty() {
        println!("\n⚠️  Errors encountered:");
        for error in &result.errors {
            println!("   - {}", error);
        }
    }

    println!("✅ All done");
    Ok(())
}
