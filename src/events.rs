//! Structured pipeline events and the observer they are delivered to.
//!
//! The pipeline never logs progress directly. It emits [`PipelineEvent`]s to a
//! [`PipelineObserver`], and the observer decides where they go. In production
//! that is [`TracingObserver`], which turns each event into one tracing event
//! carrying an `event_kind` field.
//!
//! # Events
//!
//! | Event Kind | Description |
//! |------------|-------------|
//! | `stage.started` | A lifecycle stage (search, sort, filter, collect) began |
//! | `stage.completed` | A lifecycle stage finished |
//! | `stage.skipped` | A stage was not run, with the reason |
//! | `page.started` | The walker began reading a results page |
//! | `article.collected` | An article was appended to the collection |
//! | `article.skipped` | An article fell outside the window; the walk stops |
//! | `picture.failed` | A picture could not be retrieved; the URL is kept |
//! | `walk.finished` | The walk ended, with its terminal condition and counts |

use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use std::fmt;
use tracing::{info, warn};

const TITLE_LOG_LIMIT: usize = 120;

/// Lifecycle stages of a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Sort,
    CategoryFilter,
    Collect,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Search => "search",
            Stage::Sort => "sort",
            Stage::CategoryFilter => "category_filter",
            Stage::Collect => "collect",
        };
        f.write_str(name)
    }
}

/// Why the pagination walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// An article older than the window was reached.
    DateCutoff,
    /// The site reported no further page.
    PaginationExhausted,
    /// The site does not paginate, so only one page was read.
    PaginationUnsupported,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Termination::DateCutoff => "date_cutoff",
            Termination::PaginationExhausted => "pagination_exhausted",
            Termination::PaginationUnsupported => "pagination_unsupported",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    StageStarted {
        stage: Stage,
    },
    StageCompleted {
        stage: Stage,
    },
    StageSkipped {
        stage: Stage,
        reason: String,
    },
    PageStarted {
        page: usize,
    },
    ArticleCollected {
        title: String,
        date: NaiveDate,
    },
    ArticleSkipped {
        title: String,
        date: NaiveDate,
        oldest_date: NaiveDate,
    },
    PictureRetrievalFailed {
        url: String,
        error: String,
    },
    WalkFinished {
        termination: Termination,
        pages: usize,
        articles: usize,
    },
}

impl PipelineEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineEvent::StageStarted { .. } => "stage.started",
            PipelineEvent::StageCompleted { .. } => "stage.completed",
            PipelineEvent::StageSkipped { .. } => "stage.skipped",
            PipelineEvent::PageStarted { .. } => "page.started",
            PipelineEvent::ArticleCollected { .. } => "article.collected",
            PipelineEvent::ArticleSkipped { .. } => "article.skipped",
            PipelineEvent::PictureRetrievalFailed { .. } => "picture.failed",
            PipelineEvent::WalkFinished { .. } => "walk.finished",
        }
    }
}

/// Receiver of pipeline events.
pub trait PipelineObserver {
    fn on_event(&self, event: &PipelineEvent);
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        let event_kind = event.kind();
        match event {
            PipelineEvent::StageStarted { stage } => {
                info!(event_kind, %stage, "Stage started")
            }
            PipelineEvent::StageCompleted { stage } => {
                info!(event_kind, %stage, "Stage completed")
            }
            PipelineEvent::StageSkipped { stage, reason } => {
                info!(event_kind, %stage, %reason, "Stage skipped")
            }
            PipelineEvent::PageStarted { page } => {
                info!(event_kind, page, "Reading results page")
            }
            PipelineEvent::ArticleCollected { title, date } => {
                info!(event_kind, title = %truncate_for_log(title, TITLE_LOG_LIMIT), %date, "Article collected")
            }
            PipelineEvent::ArticleSkipped {
                title,
                date,
                oldest_date,
            } => {
                info!(
                    event_kind,
                    title = %truncate_for_log(title, TITLE_LOG_LIMIT),
                    %date,
                    %oldest_date,
                    "Article older than window; stopping"
                )
            }
            PipelineEvent::PictureRetrievalFailed { url, error } => {
                warn!(event_kind, %url, %error, "Picture can't be downloaded; keeping URL")
            }
            PipelineEvent::WalkFinished {
                termination,
                pages,
                articles,
            } => {
                info!(event_kind, %termination, pages, articles, "Articles collected")
            }
        }
    }
}

/// Observer that keeps every event, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<PipelineEvent>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(PipelineEvent::kind).collect()
    }
}

#[cfg(test)]
impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            PipelineEvent::StageStarted { stage: Stage::Sort }.kind(),
            "stage.started"
        );
        assert_eq!(
            PipelineEvent::ArticleSkipped {
                title: "t".into(),
                date,
                oldest_date: date,
            }
            .kind(),
            "article.skipped"
        );
        assert_eq!(
            PipelineEvent::PictureRetrievalFailed {
                url: "u".into(),
                error: "e".into(),
            }
            .kind(),
            "picture.failed"
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Stage::CategoryFilter.to_string(), "category_filter");
        assert_eq!(Termination::DateCutoff.to_string(), "date_cutoff");
    }

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::default();
        observer.on_event(&PipelineEvent::StageStarted { stage: Stage::Search });
        observer.on_event(&PipelineEvent::StageCompleted { stage: Stage::Search });
        assert_eq!(observer.kinds(), vec!["stage.started", "stage.completed"]);
    }

    #[test]
    fn test_tracing_observer_accepts_every_event() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let observer = TracingObserver;
        observer.on_event(&PipelineEvent::PageStarted { page: 1 });
        observer.on_event(&PipelineEvent::WalkFinished {
            termination: Termination::PaginationExhausted,
            pages: 1,
            articles: 0,
        });
        observer.on_event(&PipelineEvent::ArticleCollected {
            title: "t".into(),
            date,
        });
    }
}
