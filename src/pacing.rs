//! Delays around site interactions.
//!
//! Sites throttle or block clients that click through results too quickly.
//! A [`Pacer`] runs before and after each paced call, and [`Paced`] wraps
//! any [`ScraperContract`] so the adapter itself stays free of timing code.
//!
//! # Delay Strategy
//!
//! [`FixedDelay`] sleeps a fixed amount on each side of the call, plus a
//! random jitter:
//! ```text
//! delay = fixed + random_jitter(0..=jitter)
//! ```

use crate::error::Result;
use crate::models::RawArticle;
use crate::scrapers::{Capabilities, ScraperContract};
use rand::{Rng, rng};
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Hooks run around each paced scraper operation.
pub trait Pacer {
    async fn before(&self, operation: &'static str);
    async fn after(&self, operation: &'static str);
}

/// Sleep a fixed time before and after each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    pub before: Duration,
    pub after: Duration,
    /// Upper bound of the random extra delay added to each sleep.
    pub jitter: Duration,
}

impl FixedDelay {
    /// Same delay on both sides, no jitter.
    pub fn symmetric(delay: Duration) -> Self {
        Self {
            before: delay,
            after: delay,
            jitter: Duration::ZERO,
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    fn jittered(&self, base: Duration) -> Duration {
        let max_ms = self.jitter.as_millis() as u64;
        if max_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rng().random_range(0..=max_ms))
    }

    async fn pause(&self, base: Duration, operation: &'static str, side: &'static str) {
        let delay = self.jittered(base);
        if delay.is_zero() {
            return;
        }
        debug!(operation, side, ?delay, "Pacing");
        sleep(delay).await;
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::symmetric(Duration::from_secs(3))
    }
}

impl Pacer for FixedDelay {
    async fn before(&self, operation: &'static str) {
        self.pause(self.before, operation, "before").await;
    }

    async fn after(&self, operation: &'static str) {
        self.pause(self.after, operation, "after").await;
    }
}

/// A [`ScraperContract`] whose page-changing calls are bracketed by a [`Pacer`].
///
/// Reading an article off the current page is not paced.
pub struct Paced<S, P> {
    inner: S,
    pacer: P,
}

impl<S, P> Paced<S, P> {
    pub fn new(inner: S, pacer: P) -> Self {
        Self { inner, pacer }
    }
}

impl<S: ScraperContract, P> fmt::Debug for Paced<S, P>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paced")
            .field("scraper", &self.inner.name())
            .field("pacer", &self.pacer)
            .finish()
    }
}

impl<S, P> ScraperContract for Paced<S, P>
where
    S: ScraperContract,
    P: Pacer,
{
    type Handle = S::Handle;

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities()
    }

    async fn search(&mut self, phrase: &str) -> Result<()> {
        self.pacer.before("search").await;
        let result = self.inner.search(phrase).await;
        self.pacer.after("search").await;
        result
    }

    async fn sort_by_date_descending(&mut self) -> Result<()> {
        self.pacer.before("sort").await;
        let result = self.inner.sort_by_date_descending().await;
        self.pacer.after("sort").await;
        result
    }

    async fn filter_by_category(&mut self, category: &str) -> Result<bool> {
        self.pacer.before("filter_by_category").await;
        let result = self.inner.filter_by_category(category).await;
        self.pacer.after("filter_by_category").await;
        result
    }

    async fn find_article_elements(&mut self) -> Result<Vec<Self::Handle>> {
        self.pacer.before("find_article_elements").await;
        let result = self.inner.find_article_elements().await;
        self.pacer.after("find_article_elements").await;
        result
    }

    async fn extract(&self, handle: &Self::Handle) -> Result<RawArticle> {
        self.inner.extract(handle).await
    }

    async fn paginate(&mut self) -> Result<bool> {
        self.pacer.before("paginate").await;
        let result = self.inner.paginate().await;
        self.pacer.after("paginate").await;
        result
    }
}
