//! 検証済みコントラクトのソースを一括取得する
//!
//! 実行方法:
//! ```
//! cargo run --bin contract-fetch -- --max-pages 1
//! ```

use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use tower::Service;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use verified_contracts_scraper::config::{DELAY_SECS, MAX_PAGES, PAGE_SIZE};
use verified_contracts_scraper::persist::{create_run_dir, run_timestamp};
use verified_contracts_scraper::{ScrapeRequest, ScraperConfig, ScraperService};

#[derive(Parser, Debug)]
#[command(name = "contract-fetch")]
#[command(about = "Scrape verified contract sources from Etherscan", long_about = None)]
struct Args {
    /// Number of listing pages to harvest
    #[arg(long, default_value_t = MAX_PAGES)]
    max_pages: u32,

    /// Contracts per listing page
    #[arg(long, default_value_t = PAGE_SIZE)]
    page_size: u32,

    /// Delay between requests in seconds
    #[arg(long, default_value_t = DELAY_SECS)]
    delay: f64,

    /// Directory in which contracts_<timestamp> is created
    #[arg(long, default_value = ".")]
    output_root: PathBuf,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Log a screenshot when a detail page fails
    #[arg(long)]
    debug: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// `--verbose` / `--debug` ではクレートのログを debug まで出す
fn default_filter(args: &Args) -> &'static str {
    if args.verbose || args.debug {
        "info,verified_contracts_scraper=debug"
    } else {
        "info"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(&args))),
        )
        .init();

    let config = ScraperConfig::new()
        .with_max_pages(args.max_pages)
        .with_page_size(args.page_size)
        .with_delay_secs(args.delay)?
        .with_headless(!args.headed)
        .with_debug(args.debug);

    // 出力ディレクトリを作成して移動
    let timestamp = run_timestamp(&Local::now());
    let run_dir = create_run_dir(&args.output_root, &timestamp)?;
    std::env::set_current_dir(&run_dir)?;
    info!("Output directory: {:?}", run_dir);

    let request = ScrapeRequest::new(".", timestamp).with_config(config);
    let mut service = ScraperService::new();

    match service.call(request).await {
        Ok(summary) => {
            info!(
                "Finished: {} addresses, {} saved, {} skipped, {} failed",
                summary.addresses.len(),
                summary.persisted.len(),
                summary.rejected.len(),
                summary.failed.len()
            );
            Ok(())
        }
        Err(e) => {
            error!("Fatal error: {}", e);
            Err(e.into())
        }
    }
}
