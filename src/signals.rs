//! Derived text signals for an article: search phrase frequency and money mentions.

use once_cell::sync::Lazy;
use regex::Regex;

/// `$1,250.50`, `$40`, or a bare number followed by `dollars` / `USD`.
static MONEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$[\d,]+(\.\d+)?|\d+\s(dollars|USD)").expect("money pattern is valid")
});

/// Count case-insensitive occurrences of `search_phrase` in title and description.
///
/// Occurrences are counted non-overlapping in each field separately and summed.
/// An empty phrase counts as zero occurrences.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(phrase_occurrences("covid", "COVID news", "covid, Covid"), 3);
/// ```
pub fn phrase_occurrences(search_phrase: &str, title: &str, description: &str) -> usize {
    if search_phrase.is_empty() {
        return 0;
    }
    let needle = search_phrase.to_lowercase();
    count_in(title, &needle) + count_in(description, &needle)
}

fn count_in(haystack: &str, lowered_needle: &str) -> usize {
    haystack.to_lowercase().matches(lowered_needle).count()
}

/// Whether title or description mention an amount of money.
///
/// Currency words are matched case-sensitively, so `usd` does not count.
pub fn contains_monetary_mention(title: &str, description: &str) -> bool {
    MONEY_PATTERN.is_match(title) || MONEY_PATTERN.is_match(description)
}
