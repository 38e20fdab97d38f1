//! Turns scraped articles into report rows.

use crate::events::{PipelineEvent, PipelineObserver};
use crate::models::{NormalizedArticle, RawArticle};
use crate::pictures::PictureStore;
use crate::signals::{contains_monetary_mention, phrase_occurrences};
use tracing::{debug, instrument};

/// Local filename for an article's picture.
///
/// The lower-cased title with spaces replaced by underscores, plus whatever
/// follows the last `.` in the picture URL.
pub fn picture_filename(title: &str, picture_url: &str) -> String {
    let extension = picture_url.rsplit('.').next().unwrap_or_default();
    format!("{}.{}", title.to_lowercase().replace(' ', "_"), extension)
}

/// Normalizes raw articles for one run's search phrase.
pub struct ArticleNormalizer<'a, P> {
    search_phrase: &'a str,
    pictures: &'a P,
    observer: &'a dyn PipelineObserver,
}

impl<'a, P: PictureStore> ArticleNormalizer<'a, P> {
    pub fn new(search_phrase: &'a str, pictures: &'a P, observer: &'a dyn PipelineObserver) -> Self {
        Self {
            search_phrase,
            pictures,
            observer,
        }
    }

    /// Build the canonical article and try to store its picture.
    ///
    /// A picture that cannot be retrieved never drops the article; its
    /// `picture` field keeps the original URL instead of a filename.
    #[instrument(level = "debug", skip_all, fields(title = %raw.title))]
    pub async fn normalize(&self, raw: RawArticle) -> NormalizedArticle {
        let RawArticle {
            title,
            published_at,
            description,
            picture_url,
        } = raw;

        let phrases_amount = phrase_occurrences(self.search_phrase, &title, &description);
        let contains_money = contains_monetary_mention(&title, &description);

        let filename = picture_filename(&title, &picture_url);
        let picture = match self.pictures.fetch(&picture_url, &filename).await {
            Ok(path) => {
                debug!(path = %path.display(), "Picture stored");
                filename
            }
            Err(e) => {
                self.observer.on_event(&PipelineEvent::PictureRetrievalFailed {
                    url: picture_url.clone(),
                    error: e.to_string(),
                });
                picture_url
            }
        };

        NormalizedArticle {
            title,
            date: published_at.calendar_date(),
            description,
            picture,
            phrases_amount,
            contains_money,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FakePictureStore;
    use super::*;
    use crate::events::RecordingObserver;
    use crate::models::PublishedAt;
    use chrono::NaiveDate;

    fn raw() -> RawArticle {
        RawArticle {
            title: "Covid Relief Costs $1,200".to_string(),
            published_at: PublishedAt::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            description: "Lawmakers debate covid aid".to_string(),
            picture_url: "https://cdn.example.com/images/relief.jpg".to_string(),
        }
    }

    #[test]
    fn test_picture_filename() {
        assert_eq!(
            picture_filename("Covid Relief Costs", "https://cdn.example.com/a/relief.jpg"),
            "covid_relief_costs.jpg"
        );
        assert_eq!(picture_filename("Title", "no-extension"), "title.no-extension");
    }

    #[tokio::test]
    async fn test_normalize_with_working_store() {
        let store = FakePictureStore::working();
        let observer = RecordingObserver::default();
        let normalizer = ArticleNormalizer::new("covid", &store, &observer);

        let article = normalizer.normalize(raw()).await;

        assert_eq!(article.title, "Covid Relief Costs $1,200");
        assert_eq!(article.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(article.picture, "covid_relief_costs_$1,200.jpg");
        assert_eq!(article.phrases_amount, 2);
        assert!(article.contains_money);
        assert!(observer.events().is_empty());
        assert_eq!(
            store.calls(),
            vec![(
                "https://cdn.example.com/images/relief.jpg".to_string(),
                "covid_relief_costs_$1,200.jpg".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_normalize_keeps_url_when_picture_fails() {
        let store = FakePictureStore::failing();
        let observer = RecordingObserver::default();
        let normalizer = ArticleNormalizer::new("covid", &store, &observer);

        let article = normalizer.normalize(raw()).await;

        assert_eq!(article.picture, "https://cdn.example.com/images/relief.jpg");
        assert_eq!(article.phrases_amount, 2);
        assert_eq!(observer.kinds(), vec!["picture.failed"]);
    }

    #[tokio::test]
    async fn test_normalize_is_repeatable() {
        let store = FakePictureStore::working();
        let observer = RecordingObserver::default();
        let normalizer = ArticleNormalizer::new("covid", &store, &observer);

        let first = normalizer.normalize(raw()).await;
        let second = normalizer.normalize(raw()).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_store_outcome_only_changes_picture() {
        let observer = RecordingObserver::default();
        let working = FakePictureStore::working();
        let failing = FakePictureStore::failing();

        let ok = ArticleNormalizer::new("covid", &working, &observer)
            .normalize(raw())
            .await;
        let failed = ArticleNormalizer::new("covid", &failing, &observer)
            .normalize(raw())
            .await;

        assert_ne!(ok.picture, failed.picture);
        assert_eq!(
            NormalizedArticle {
                picture: String::new(),
                ..ok
            },
            NormalizedArticle {
                picture: String::new(),
                ..failed
            }
        );
    }
}
