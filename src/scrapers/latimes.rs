//! Los Angeles Times search scraper.
//!
//! This module drives the search page of [latimes.com](https://www.latimes.com)
//! over plain HTTP. The search form, sort dropdown, topic checkboxes and
//! "next page" link all map to query parameters, so each step reloads the
//! results page with one more parameter set:
//!
//! | Step | Query parameter |
//! |------|-----------------|
//! | search | `q=<phrase>` |
//! | sort newest first | `s=1` |
//! | topic filter | `f0=<topic id>` (name taken from the checkbox) |
//! | next page | followed from the pagination link |

use super::{Capabilities, ScraperContract};
use crate::error::{Error, Result};
use crate::models::{PublishedAt, RawArticle};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

const START_URL: &str = "https://www.latimes.com/";
const SORT_NEWEST: &str = "1";

/// One search result card, kept as its HTML along with the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCard {
    html: String,
    base: Url,
}

/// Search session on latimes.com.
#[derive(Debug)]
pub struct LaTimesScraper {
    client: Client,
    start_url: Url,
    current_url: Option<Url>,
    current_html: String,
}

impl LaTimesScraper {
    pub fn new(client: Client) -> Result<Self> {
        Self::with_start_url(client, START_URL)
    }

    /// Session against another host serving the same markup.
    pub fn with_start_url(client: Client, start_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            start_url: Url::parse(start_url)?,
            current_url: None,
            current_html: String::new(),
        })
    }

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn load(&mut self, url: Url) -> Result<()> {
        let html = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        info!(bytes = html.len(), "Loaded results page");
        self.current_html = html;
        self.current_url = Some(url);
        Ok(())
    }

    fn current_url(&self) -> Result<&Url> {
        self.current_url
            .as_ref()
            .ok_or_else(|| Error::SelectorResolution("no results page loaded; search first".to_string()))
    }
}

impl ScraperContract for LaTimesScraper {
    type Handle = PromoCard;

    fn name(&self) -> &str {
        "latimes"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            pagination: true,
            category_filter: true,
        }
    }

    async fn search(&mut self, phrase: &str) -> Result<()> {
        let mut url = self.start_url.join("search")?;
        url.query_pairs_mut().append_pair("q", phrase);
        self.load(url).await
    }

    async fn sort_by_date_descending(&mut self) -> Result<()> {
        let url = with_query_param(self.current_url()?, "s", SORT_NEWEST);
        self.load(url).await
    }

    async fn filter_by_category(&mut self, category: &str) -> Result<bool> {
        let Some(topic) = find_topic(&self.current_html, category)? else {
            return Ok(false);
        };
        info!(%category, id = %topic.value, "Filtering by topic");
        let url = with_query_param(self.current_url()?, &topic.param, &topic.value);
        self.load(url).await?;
        Ok(true)
    }

    async fn find_article_elements(&mut self) -> Result<Vec<PromoCard>> {
        let base = self.current_url()?;
        parse_cards(&self.current_html, base)
    }

    async fn extract(&self, handle: &PromoCard) -> Result<RawArticle> {
        parse_promo(handle)
    }

    async fn paginate(&mut self) -> Result<bool> {
        let Some(href) = next_page_href(&self.current_html)? else {
            debug!("No next page link");
            return Ok(false);
        };
        let url = self.current_url()?.join(&href)?;
        self.load(url).await?;
        Ok(true)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::SelectorResolution(format!("invalid selector `{css}`: {e}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn require<'a>(root: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>> {
    root.select(&selector(css)?)
        .next()
        .ok_or_else(|| Error::SelectorResolution(format!("`{css}` not found in search result")))
}

/// Replace (or add) a single query parameter.
fn with_query_param(url: &Url, key: &str, value: &str) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut next = url.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(key, value);
    next
}

/// Result cards in page order. Relative links resolve against `base`.
pub fn parse_cards(html: &str, base: &Url) -> Result<Vec<PromoCard>> {
    let document = Html::parse_document(html);
    let cards = document
        .select(&selector("ul.search-results-module-results-menu > li")?)
        .map(|li| PromoCard {
            html: li.html(),
            base: base.clone(),
        })
        .collect::<Vec<_>>();
    debug!(count = cards.len(), "Parsed result cards");
    Ok(cards)
}

/// Read headline, timestamp, teaser and picture from one card.
pub fn parse_promo(card: &PromoCard) -> Result<RawArticle> {
    let fragment = Html::parse_fragment(&card.html);
    let root = fragment.root_element();

    let title = text_of(require(root, "h3.promo-title")?);
    let timestamp = require(root, "p.promo-timestamp")?
        .value()
        .attr("data-timestamp")
        .ok_or_else(|| Error::SelectorResolution("promo timestamp has no data-timestamp".to_string()))?;
    let published_at = parse_timestamp(timestamp)?;
    let description = text_of(require(root, "p.promo-description")?);
    let src = require(root, "img.image")?.value().attr("src").unwrap_or_default();
    let picture_url = match card.base.join(src) {
        Ok(url) if !src.is_empty() => url.to_string(),
        _ => src.to_string(),
    };

    Ok(RawArticle {
        title,
        published_at,
        description,
        picture_url,
    })
}

/// Milliseconds since the epoch, possibly written as a float.
fn parse_timestamp(raw: &str) -> Result<PublishedAt> {
    let raw = raw.trim();
    // `as` saturates, so NaN and out-of-range floats are rejected before the cast.
    let millis = raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    });
    millis
        .and_then(PublishedAt::from_millis)
        .ok_or_else(|| Error::SelectorResolution(format!("unreadable timestamp `{raw}`")))
}

/// Checkbox for a topic in the "Topics" filter menu.
#[derive(Debug, PartialEq, Eq)]
pub struct Topic {
    param: String,
    value: String,
}

/// Find the topic whose label matches `category`, ignoring case.
pub fn find_topic(html: &str, category: &str) -> Result<Option<Topic>> {
    let document = Html::parse_document(html);
    let items = selector(r#"ul.search-filter-menu[data-name="Topics"] > li"#)?;
    let label = selector("label span")?;
    let input = selector("label input")?;
    let wanted = category.to_lowercase();

    for item in document.select(&items) {
        let Some(name) = item.select(&label).next().map(text_of) else {
            continue;
        };
        if name.to_lowercase() != wanted {
            continue;
        }
        let checkbox = item
            .select(&input)
            .next()
            .ok_or_else(|| Error::SelectorResolution(format!("topic `{name}` has no checkbox")))?;
        let value = checkbox
            .value()
            .attr("value")
            .ok_or_else(|| Error::SelectorResolution(format!("topic `{name}` has no value")))?;
        return Ok(Some(Topic {
            param: checkbox.value().attr("name").unwrap_or("f0").to_string(),
            value: value.to_string(),
        }));
    }
    Ok(None)
}

/// Target of the "next page" link, if any.
pub fn next_page_href(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let link = selector("div.search-results-module-next-page a")?;
    Ok(document
        .select(&link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string))
}
