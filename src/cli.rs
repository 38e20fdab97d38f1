//! Command-line interface definitions for News Sweep.
//!
//! All arguments can be provided via command-line flags or environment variables.
//! Run parameters may also come from a work-item file (see [`crate::config`]).

use clap::{Parser, ValueEnum};

/// Site adapters available from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Site {
    /// Los Angeles Times
    Latimes,
}

/// Command-line arguments for the News Sweep application.
///
/// # Examples
///
/// ```sh
/// # Articles about coronavirus from the last three months
/// news_sweep -s coronavirus -n 3
///
/// # Narrowed to one topic, written to ./reports
/// news_sweep -s coronavirus -c California -o ./reports
///
/// # Parameters from a work-item file
/// news_sweep -w work_item.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Phrase to search for
    #[arg(short, long, env = "SEARCH_PHRASE")]
    pub search_phrase: Option<String>,

    /// Only keep articles from the last N months (0 means 1)
    #[arg(short = 'n', long, env = "LAST_N_MONTHS", allow_negative_numbers = true)]
    pub last_n_months: Option<i64>,

    /// Category to filter results by, if the site supports it
    #[arg(short, long, env = "CATEGORY")]
    pub category: Option<String>,

    /// YAML or JSON file with search_phrase, last_n_months and category
    #[arg(short, long, env = "WORK_ITEM_PATH")]
    pub work_item: Option<String>,

    /// Output directory for the report and work item
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "output")]
    pub output_dir: String,

    /// Directory for downloaded pictures [default: <output-dir>/pictures]
    #[arg(long, env = "PICTURES_DIR")]
    pub pictures_dir: Option<String>,

    /// Delay before and after each page interaction, in milliseconds
    #[arg(long, env = "DELAY_MS", default_value_t = 3000)]
    pub delay_ms: u64,

    /// Maximum random extra delay, in milliseconds
    #[arg(long, env = "JITTER_MS", default_value_t = 0)]
    pub jitter_ms: u64,

    /// Site to scrape
    #[arg(long, value_enum, default_value_t = Site::Latimes)]
    pub scraper: Site,
}

impl Cli {
    pub fn pictures_dir(&self) -> String {
        self.pictures_dir
            .clone()
            .unwrap_or_else(|| format!("{}/pictures", self.output_dir.trim_end_matches('/')))
    }
}
