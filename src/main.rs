//! # News Sweep
//!
//! Collects news articles from a publication's search results and writes
//! them to a tabular report.
//!
//! ## Features
//!
//! - Searches a news site for a phrase, sorts results newest first and
//!   optionally narrows them to one category
//! - Walks result pages until articles fall out of the requested window
//! - Counts search phrase occurrences and flags mentions of money
//! - Downloads article pictures, keeping the URL when a download fails
//! - Writes a CSV report and a JSON output work item
//!
//! ## Usage
//!
//! ```sh
//! news_sweep -s coronavirus -n 3 -c California
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Parameters**: Resolve run parameters and the date window
//! 2. **Search**: Search, sort and filter on the site
//! 3. **Collect**: Walk result pages, normalizing each article
//! 4. **Output**: Write the report and the output work item

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod events;
mod models;
mod normalizer;
mod outputs;
mod pacing;
mod pictures;
mod scrapers;
mod signals;
mod utils;
mod walker;
mod window;

use cli::{Cli, Site};
use config::{RunParams, WorkItem};
use events::TracingObserver;
use outputs::{json, report};
use pacing::{FixedDelay, Paced};
use pictures::HttpPictureStore;
use scrapers::ScraperContract;
use scrapers::latimes::LaTimesScraper;
use utils::ensure_writable_dir;
use window::SearchWindow;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_sweep starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Parameters, validated before any network activity ----
    let work_item = match &args.work_item {
        Some(path) => WorkItem::load(path).await?,
        None => WorkItem::default(),
    };
    let params = match RunParams::resolve(&args, work_item) {
        Ok(params) => params,
        Err(e) => {
            error!(error = %e, "Invalid run parameters");
            return Err(e.into());
        }
    };
    let window = SearchWindow::last_n_months(params.last_n_months)?;
    info!(
        phrase = %params.search_phrase,
        last_n_months = params.last_n_months,
        category = ?params.category,
        oldest_date = %window.oldest_date,
        "Run parameters resolved"
    );

    // ---- Output directories ----
    let pictures_dir = args.pictures_dir();
    for dir in [&args.output_dir, &pictures_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Directory is not writable (fix perms or choose a different path)");
            return Err(e.into());
        }
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?;
    let pictures = HttpPictureStore::new(client.clone(), &pictures_dir);
    debug!(dir = %pictures.dir().display(), "Pictures directory ready");
    let pacer = FixedDelay::symmetric(Duration::from_millis(args.delay_ms))
        .with_jitter(Duration::from_millis(args.jitter_ms));
    let observer = TracingObserver;

    let mut scraper = match args.scraper {
        Site::Latimes => Paced::new(LaTimesScraper::new(client)?, pacer),
    };

    // ---- Collect ----
    let articles = match scrapers::collect(&mut scraper, &params, window, &pictures, &observer).await {
        Ok(articles) => articles,
        Err(e) => {
            error!(scraper = scraper.name(), error = %e, "Collection failed");
            return Err(e.into());
        }
    };

    if articles.is_empty() {
        warn!(phrase = %params.search_phrase, "No articles inside the window; writing an empty report");
    }

    // ---- Output ----
    let report_path = report::write_report(&articles, scraper.name(), &args.output_dir)?;
    let work_item_path = json::write_work_item(&articles, scraper.name(), &args.output_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = articles.len(),
        report = %report_path.display(),
        work_item = %work_item_path.display(),
        "Execution complete"
    );

    Ok(())
}
