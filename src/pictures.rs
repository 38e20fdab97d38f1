//! Picture retrieval for article thumbnails.
//!
//! Retrieval is best-effort: a [`PictureError`] is reported to the caller,
//! which keeps the original URL and moves on.

use reqwest::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum PictureError {
    /// The picture URL is not an absolute http(s) URL
    #[error("invalid picture URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The derived filename cannot be stored as a single file
    #[error("invalid picture filename `{0}`")]
    InvalidFilename(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for pictures, keyed by filename.
pub trait PictureStore {
    /// Download `url` and store it as `filename`.
    ///
    /// On failure nothing is left behind under `filename`.
    async fn fetch(&self, url: &str, filename: &str) -> Result<PathBuf, PictureError>;
}

/// Downloads pictures over HTTP into a directory.
#[derive(Debug, Clone)]
pub struct HttpPictureStore {
    client: Client,
    dir: PathBuf,
}

impl HttpPictureStore {
    pub fn new(client: Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Parse `url` and make sure it can be downloaded.
pub fn parse_picture_url(url: &str) -> Result<Url, PictureError> {
    let parsed = Url::parse(url).map_err(|e| PictureError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(PictureError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn check_filename(filename: &str) -> Result<(), PictureError> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);
    if bad {
        Err(PictureError::InvalidFilename(filename.to_string()))
    } else {
        Ok(())
    }
}

impl PictureStore for HttpPictureStore {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str, filename: &str) -> Result<PathBuf, PictureError> {
        check_filename(filename)?;
        let parsed = parse_picture_url(url)?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PictureError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;

        // Write next to the target and rename; a failed write or rename leaves nothing behind.
        let target = self.dir.join(filename);
        let partial = self.dir.join(format!("{filename}.part"));
        let stored = async {
            fs::write(&partial, &bytes).await?;
            fs::rename(&partial, &target).await
        }
        .await;
        if let Err(e) = stored {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }

        debug!(bytes = bytes.len(), path = %target.display(), "Stored picture");
        info!(%filename, "Picture downloaded");
        Ok(target)
    }
}
