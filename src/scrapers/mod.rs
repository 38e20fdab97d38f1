//! Site adapters and the collection lifecycle they plug into.
//!
//! Every publication is scraped through the same [`ScraperContract`]. A run
//! follows a fixed order of stages:
//!
//! 1. **Search**: submit the search phrase
//! 2. **Sort**: order results newest first
//! 3. **Category filter**: only if the adapter supports it and a category was given
//! 4. **Collect**: walk the result pages (see [`crate::walker`])
//!
//! # Supported Sources
//!
//! | Source | Module | Pagination | Category filter |
//! |--------|--------|------------|-----------------|
//! | Los Angeles Times | [`latimes`] | yes | yes |

pub mod latimes;

use crate::config::RunParams;
use crate::error::{Error, Result};
use crate::events::{PipelineEvent, PipelineObserver, Stage};
use crate::models::{ArticleCollection, RawArticle};
use crate::pictures::PictureStore;
use crate::walker::PaginationWalker;
use crate::window::SearchWindow;
use tracing::{info, instrument, warn};

/// Optional features a site declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Results span several pages reachable through [`ScraperContract::paginate`].
    pub pagination: bool,
    /// Results can be narrowed with [`ScraperContract::filter_by_category`].
    pub category_filter: bool,
}

/// Operations a site adapter provides to the collection pipeline.
///
/// Adapters hold the browsing session; every call acts on the current
/// results page.
pub trait ScraperContract {
    /// Opaque reference to one article on the current page.
    type Handle;

    /// Short name used for output files, e.g. `latimes`.
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    async fn search(&mut self, phrase: &str) -> Result<()>;

    async fn sort_by_date_descending(&mut self) -> Result<()>;

    /// Narrow results to `category`. Returns whether a matching category existed.
    async fn filter_by_category(&mut self, category: &str) -> Result<bool> {
        let _ = category;
        Err(Error::unimplemented(self.name(), "filter_by_category"))
    }

    /// Articles on the current page, in on-page order.
    async fn find_article_elements(&mut self) -> Result<Vec<Self::Handle>>;

    async fn extract(&self, handle: &Self::Handle) -> Result<RawArticle>;

    /// Advance to the next results page. Returns `false` when there is none.
    async fn paginate(&mut self) -> Result<bool> {
        Err(Error::unimplemented(self.name(), "paginate"))
    }
}

/// Run search, sort, optional filter, and the pagination walk.
///
/// Everything but picture retrieval is fail-fast: the first error aborts
/// the run.
#[instrument(level = "info", skip_all, fields(scraper = %scraper.name(), phrase = %params.search_phrase))]
pub async fn collect<S, P>(
    scraper: &mut S,
    params: &RunParams,
    window: SearchWindow,
    pictures: &P,
    observer: &dyn PipelineObserver,
) -> Result<ArticleCollection>
where
    S: ScraperContract,
    P: PictureStore,
{
    observer.on_event(&PipelineEvent::StageStarted {
        stage: Stage::Search,
    });
    scraper.search(&params.search_phrase).await?;
    observer.on_event(&PipelineEvent::StageCompleted {
        stage: Stage::Search,
    });

    observer.on_event(&PipelineEvent::StageStarted { stage: Stage::Sort });
    scraper.sort_by_date_descending().await?;
    observer.on_event(&PipelineEvent::StageCompleted { stage: Stage::Sort });

    match (&params.category, scraper.capabilities().category_filter) {
        (Some(category), true) => {
            observer.on_event(&PipelineEvent::StageStarted {
                stage: Stage::CategoryFilter,
            });
            if !scraper.filter_by_category(category).await? {
                warn!(%category, "No matching category; results are unfiltered");
            }
            observer.on_event(&PipelineEvent::StageCompleted {
                stage: Stage::CategoryFilter,
            });
        }
        (Some(_), false) => observer.on_event(&PipelineEvent::StageSkipped {
            stage: Stage::CategoryFilter,
            reason: "scraper has no category filter".to_string(),
        }),
        (None, _) => observer.on_event(&PipelineEvent::StageSkipped {
            stage: Stage::CategoryFilter,
            reason: "no category requested".to_string(),
        }),
    }

    observer.on_event(&PipelineEvent::StageStarted {
        stage: Stage::Collect,
    });
    let walk = PaginationWalker::new(scraper, window, &params.search_phrase, pictures, observer)
        .walk()
        .await?;
    info!(termination = %walk.termination, pages = walk.pages, "Walk finished");
    observer.on_event(&PipelineEvent::StageCompleted {
        stage: Stage::Collect,
    });

    Ok(walk.articles)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::VecDeque;

    /// In-memory adapter serving pre-built pages of dated articles.
    #[derive(Debug, Default)]
    pub struct FakeScraper {
        pub capabilities: Capabilities,
        pub pages: VecDeque<Vec<RawArticle>>,
        pub current: Vec<RawArticle>,
        pub calls: Vec<String>,
        pub extracted: std::cell::RefCell<Vec<String>>,
        pub category_matches: bool,
        pub implements_paginate: bool,
    }

    pub fn dated(title: &str, date: NaiveDate) -> RawArticle {
        RawArticle {
            title: title.to_string(),
            published_at: date.into(),
            description: format!("About {title}"),
            picture_url: format!("https://cdn.example.com/{title}.jpg"),
        }
    }

    impl FakeScraper {
        pub fn with_pages(capabilities: Capabilities, pages: Vec<Vec<RawArticle>>) -> Self {
            Self {
                capabilities,
                pages: pages.into(),
                category_matches: true,
                implements_paginate: true,
                ..Self::default()
            }
        }

        pub fn extracted(&self) -> Vec<String> {
            self.extracted.borrow().clone()
        }
    }

    impl ScraperContract for FakeScraper {
        type Handle = usize;

        fn name(&self) -> &str {
            "fake"
        }

        fn capabilities(&self) -> Capabilities {
            self.capabilities
        }

        async fn search(&mut self, phrase: &str) -> Result<()> {
            self.calls.push(format!("search:{phrase}"));
            self.current = self.pages.pop_front().unwrap_or_default();
            Ok(())
        }

        async fn sort_by_date_descending(&mut self) -> Result<()> {
            self.calls.push("sort".to_string());
            Ok(())
        }

        async fn filter_by_category(&mut self, category: &str) -> Result<bool> {
            self.calls.push(format!("filter:{category}"));
            Ok(self.category_matches)
        }

        async fn find_article_elements(&mut self) -> Result<Vec<usize>> {
            self.calls.push("find".to_string());
            Ok((0..self.current.len()).collect())
        }

        async fn extract(&self, handle: &usize) -> Result<RawArticle> {
            let article = self.current[*handle].clone();
            self.extracted.borrow_mut().push(article.title.clone());
            Ok(article)
        }

        async fn paginate(&mut self) -> Result<bool> {
            if !self.implements_paginate {
                return Err(Error::unimplemented(self.name(), "paginate"));
            }
            self.calls.push("paginate".to_string());
            match self.pages.pop_front() {
                Some(page) => {
                    self.current = page;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    /// Adapter that only implements the required operations.
    #[derive(Debug, Default)]
    pub struct MinimalScraper {
        pub capabilities: Capabilities,
    }

    impl ScraperContract for MinimalScraper {
        type Handle = ();

        fn name(&self) -> &str {
            "minimal"
        }

        fn capabilities(&self) -> Capabilities {
            self.capabilities
        }

        async fn search(&mut self, _phrase: &str) -> Result<()> {
            Ok(())
        }

        async fn sort_by_date_descending(&mut self) -> Result<()> {
            Ok(())
        }

        async fn find_article_elements(&mut self) -> Result<Vec<()>> {
            Ok(Vec::new())
        }

        async fn extract(&self, _handle: &()) -> Result<RawArticle> {
            Err(Error::SelectorResolution("no articles".to_string()))
        }
    }
}
