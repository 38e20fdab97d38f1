//! Page-by-page walk over sorted search results.
//!
//! Results arrive newest first, so the first article older than the window
//! ends the whole walk: nothing after it on the page, and no later page, can
//! be inside the window.

use crate::error::Result;
use crate::events::{PipelineEvent, PipelineObserver, Termination};
use crate::models::ArticleCollection;
use crate::normalizer::ArticleNormalizer;
use crate::pictures::PictureStore;
use crate::scrapers::ScraperContract;
use crate::window::SearchWindow;
use tracing::{debug, instrument};

/// Outcome of a finished walk.
#[derive(Debug)]
pub struct Walk {
    pub articles: ArticleCollection,
    pub termination: Termination,
    pub pages: usize,
}

enum PageOutcome {
    Consumed,
    CutoffReached,
}

pub struct PaginationWalker<'a, S, P> {
    scraper: &'a mut S,
    window: SearchWindow,
    normalizer: ArticleNormalizer<'a, P>,
    observer: &'a dyn PipelineObserver,
    articles: ArticleCollection,
    pages: usize,
}

impl<'a, S, P> PaginationWalker<'a, S, P>
where
    S: ScraperContract,
    P: PictureStore,
{
    pub fn new(
        scraper: &'a mut S,
        window: SearchWindow,
        search_phrase: &'a str,
        pictures: &'a P,
        observer: &'a dyn PipelineObserver,
    ) -> Self {
        Self {
            scraper,
            window,
            normalizer: ArticleNormalizer::new(search_phrase, pictures, observer),
            observer,
            articles: ArticleCollection::new(),
            pages: 0,
        }
    }

    /// Walk pages until the date cutoff, the last page, or the only page.
    #[instrument(level = "info", skip_all, fields(oldest_date = %self.window.oldest_date))]
    pub async fn walk(mut self) -> Result<Walk> {
        let paginates = self.scraper.capabilities().pagination;

        let termination = loop {
            if let PageOutcome::CutoffReached = self.visit_page().await? {
                break Termination::DateCutoff;
            }
            if !paginates {
                break Termination::PaginationUnsupported;
            }
            if !self.scraper.paginate().await? {
                break Termination::PaginationExhausted;
            }
        };

        self.observer.on_event(&PipelineEvent::WalkFinished {
            termination,
            pages: self.pages,
            articles: self.articles.len(),
        });
        Ok(Walk {
            articles: self.articles,
            termination,
            pages: self.pages,
        })
    }

    async fn visit_page(&mut self) -> Result<PageOutcome> {
        self.pages += 1;
        self.observer
            .on_event(&PipelineEvent::PageStarted { page: self.pages });

        let handles = self.scraper.find_article_elements().await?;
        debug!(page = self.pages, count = handles.len(), "Found article elements");

        for handle in &handles {
            let raw = self.scraper.extract(handle).await?;
            let date = raw.published_at.calendar_date();

            // Out-of-window articles are dropped before any picture is fetched.
            if !self.window.contains(date) {
                self.observer.on_event(&PipelineEvent::ArticleSkipped {
                    title: raw.title,
                    date,
                    oldest_date: self.window.oldest_date,
                });
                return Ok(PageOutcome::CutoffReached);
            }

            let article = self.normalizer.normalize(raw).await;
            self.observer.on_event(&PipelineEvent::ArticleCollected {
                title: article.title.clone(),
                date: article.date,
            });
            self.articles.push(article);
        }
        Ok(PageOutcome::Consumed)
    }
}
