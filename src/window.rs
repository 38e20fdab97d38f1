//! Date window for deciding which articles are recent enough to keep.
//!
//! A month is approximated as 30 days. The cutoff for `n` months is
//! `today - (30 * n - 1)` days, and `0` months means the same as `1`.
//! Consumers rely on this exact cutoff, so it is not calendar month arithmetic.

use crate::error::{Error, Result};
use chrono::{Duration, Local, NaiveDate};
use tracing::debug;

const DAYS_PER_MONTH: i64 = 30;

/// Compute the oldest publication date still inside the window, relative to now.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `last_n_months` is negative.
pub fn compute_oldest_date(last_n_months: i64) -> Result<NaiveDate> {
    oldest_date_from(Local::now().date_naive(), last_n_months)
}

/// Same as [`compute_oldest_date`] with an explicit "today".
pub fn oldest_date_from(today: NaiveDate, last_n_months: i64) -> Result<NaiveDate> {
    if last_n_months < 0 {
        return Err(Error::InvalidParameter(format!(
            "last_n_months must be non-negative, got {last_n_months}"
        )));
    }
    let months = last_n_months.max(1);
    let days = months
        .checked_mul(DAYS_PER_MONTH)
        .map(|d| d - 1)
        .ok_or_else(|| Error::InvalidParameter(format!("last_n_months too large: {last_n_months}")))?;

    let oldest = Duration::try_days(days)
        .and_then(|span| today.checked_sub_signed(span))
        .ok_or_else(|| Error::InvalidParameter(format!("last_n_months too large: {last_n_months}")))?;
    debug!(%today, months, %oldest, "Computed oldest date");
    Ok(oldest)
}

/// The inclusive range `[oldest_date, now]` of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub oldest_date: NaiveDate,
}

impl SearchWindow {
    pub fn new(oldest_date: NaiveDate) -> Self {
        Self { oldest_date }
    }

    /// Window ending today and reaching back `last_n_months`.
    pub fn last_n_months(last_n_months: i64) -> Result<Self> {
        compute_oldest_date(last_n_months).map(Self::new)
    }

    /// Whether `date` is recent enough to keep.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.oldest_date
    }
}
