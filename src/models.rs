//! Data models for scraped and normalized articles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawArticle`]: Article data as read off a search results page
//! - [`NormalizedArticle`]: Canonical article with derived signals, one report row
//! - [`ArticleCollection`]: Ordered, append-only result of one run

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Publication moment as a site exposes it.
///
/// Some sites print a calendar date, others a timestamp. Either way the
/// article ends up with a plain calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedAt {
    /// Already a calendar date.
    Date(NaiveDate),
    /// A point in time, authored in any timezone.
    Instant(DateTime<chrono::FixedOffset>),
}

impl PublishedAt {
    /// Build from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|utc| Self::Instant(utc.fixed_offset()))
    }

    /// Calendar date in the local timezone of the run.
    pub fn calendar_date(&self) -> NaiveDate {
        match self {
            PublishedAt::Date(date) => *date,
            PublishedAt::Instant(instant) => Local.from_utc_datetime(&instant.naive_utc()).date_naive(),
        }
    }
}

impl From<NaiveDate> for PublishedAt {
    fn from(date: NaiveDate) -> Self {
        PublishedAt::Date(date)
    }
}

/// A single search result as scraped by a site adapter.
///
/// Lives only while its page is being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    /// The article headline.
    pub title: String,
    /// When the article was published.
    pub published_at: PublishedAt,
    /// The teaser text shown under the headline.
    pub description: String,
    /// Absolute URL of the article's picture.
    pub picture_url: String,
}

/// A processed article, ready to become one row of the report.
///
/// Field order is the report's column order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NormalizedArticle {
    pub title: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub description: String,
    /// Local picture filename, or the original URL when the download failed.
    pub picture: String,
    /// Case-insensitive occurrences of the search phrase in title and description.
    pub phrases_amount: usize,
    /// Whether title or description mention an amount of money.
    pub contains_money: bool,
}

/// Articles collected during one run, in discovery order (newest first).
///
/// Only [`crate::walker`] appends to it; nothing removes or edits entries.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleCollection {
    articles: Vec<NormalizedArticle>,
}

impl ArticleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, article: NormalizedArticle) {
        self.articles.push(article);
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedArticle> {
        self.articles.iter()
    }
}

impl<'a> IntoIterator for &'a ArticleCollection {
    type Item = &'a NormalizedArticle;
    type IntoIter = std::slice::Iter<'a, NormalizedArticle>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}
