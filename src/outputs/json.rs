//! Output work item for downstream jobs.
//!
//! The collected articles are serialized as one JSON document:
//! ```text
//! {"articles": [{"title": ..., "date": "2024-06-01", ...}, ...]}
//! ```

use crate::error::Result;
use crate::models::ArticleCollection;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Write `<output_dir>/<scraper_name>.json`.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip(articles), fields(count = articles.len()))]
pub async fn write_work_item(
    articles: &ArticleCollection,
    scraper_name: &str,
    output_dir: &str,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(articles)?;
    let path = PathBuf::from(output_dir).join(format!("{scraper_name}.json"));

    info!(path = %path.display(), "Writing output work item");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote output work item");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedArticle;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_work_item_lists_articles() {
        let mut articles = ArticleCollection::new();
        articles.push(NormalizedArticle {
            title: "Covid cases climb".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description: "Hospitals report".to_string(),
            picture: "covid_cases_climb.jpg".to_string(),
            phrases_amount: 1,
            contains_money: false,
        });
        let dir = tempdir().unwrap();

        let path = write_work_item(&articles, "latimes", dir.path().to_str().unwrap())
            .await
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        let listed = value["articles"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["date"], "2024-06-01");
        assert_eq!(listed[0]["picture"], "covid_cases_climb.jpg");
        assert_eq!(listed[0]["contains_money"], false);
    }

    #[tokio::test]
    async fn test_empty_work_item() {
        let dir = tempdir().unwrap();
        let path = write_work_item(&ArticleCollection::new(), "latimes", dir.path().to_str().unwrap())
            .await
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "articles": [] }));
    }
}
