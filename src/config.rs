//! Run parameters.
//!
//! Parameters come from the command line and, optionally, from a work-item
//! file. Command-line values win; anything left unset falls back to the
//! work item and then to defaults.
//!
//! # Work Item Format
//!
//! YAML (or JSON, which is valid YAML):
//!
//! ```yaml
//! search_phrase: coronavirus
//! last_n_months: 3
//! category: California
//! ```

use crate::cli::Cli;
use crate::error::{Error, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::{info, instrument};

/// Input work item as stored on disk.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct WorkItem {
    pub search_phrase: Option<String>,
    pub last_n_months: Option<i64>,
    pub category: Option<String>,
}

impl WorkItem {
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path).await?;
        let item = Self::parse(&text)?;
        info!(?item, "Loaded work item");
        Ok(item)
    }
}

/// Validated parameters of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub search_phrase: String,
    /// Never negative.
    pub last_n_months: i64,
    pub category: Option<String>,
}

impl RunParams {
    /// Merge command-line values over the work item and validate.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for a missing or blank search phrase, or a
    /// negative month count.
    pub fn resolve(cli: &Cli, work_item: WorkItem) -> Result<Self> {
        let search_phrase = cli
            .search_phrase
            .clone()
            .or(work_item.search_phrase)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::InvalidParameter("search phrase is required".to_string()))?;

        let last_n_months = cli.last_n_months.or(work_item.last_n_months).unwrap_or(0);
        if last_n_months < 0 {
            return Err(Error::InvalidParameter(format!(
                "last_n_months must be non-negative, got {last_n_months}"
            )));
        }

        let category = cli
            .category
            .clone()
            .or(work_item.category)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            search_phrase,
            last_n_months,
            category,
        })
    }
}
