//! Error types for a collection run.
//!
//! Everything here is fatal: the run aborts and the operator re-runs the job.
//! Picture retrieval failures are the one recoverable case and live in
//! [`crate::pictures::PictureError`] instead.

use thiserror::Error;

/// Error type for pipeline operations
#[derive(Debug, Error)]
pub enum Error {
    /// A run parameter is out of range or missing
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A site adapter was asked for an operation it does not provide
    #[error("scraper `{scraper}` does not implement `{operation}`")]
    ContractUnimplemented {
        scraper: String,
        operation: &'static str,
    },

    /// An expected page element could not be found
    #[error("selector did not resolve: {0}")]
    SelectorResolution(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular report error
    #[error("report error: {0}")]
    Report(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Work-item file could not be parsed
    #[error("work item error: {0}")]
    WorkItem(#[from] serde_yaml::Error),
}

impl Error {
    pub fn unimplemented(scraper: &str, operation: &'static str) -> Self {
        Error::ContractUnimplemented {
            scraper: scraper.to_string(),
            operation,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
