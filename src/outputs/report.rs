//! Tabular report of collected articles.
//!
//! Columns, in order: `title, date, description, picture, phrases_amount,
//! contains_money`. The header row names the columns and each following row
//! is one article, in collection order.

use crate::error::Result;
use crate::models::ArticleCollection;
use std::path::PathBuf;
use tracing::{info, instrument};

pub const REPORT_HEADERS: [&str; 6] = [
    "title",
    "date",
    "description",
    "picture",
    "phrases_amount",
    "contains_money",
];

/// Write `<output_dir>/<scraper_name>.csv`.
///
/// # Returns
///
/// The path of the written report.
#[instrument(level = "info", skip(articles), fields(count = articles.len()))]
pub fn write_report(
    articles: &ArticleCollection,
    scraper_name: &str,
    output_dir: &str,
) -> Result<PathBuf> {
    let path = PathBuf::from(output_dir).join(format!("{scraper_name}.csv"));
    let mut writer = csv::Writer::from_path(&path)?;

    writer.write_record(REPORT_HEADERS)?;
    for article in articles {
        writer.write_record([
            article.title.clone(),
            article.date.to_string(),
            article.description.clone(),
            article.picture.clone(),
            article.phrases_amount.to_string(),
            article.contains_money.to_string(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = articles.len(), "Wrote report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedArticle;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn collection() -> ArticleCollection {
        let mut articles = ArticleCollection::new();
        articles.push(NormalizedArticle {
            title: "Covid, again".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description: "Costs $40".to_string(),
            picture: "covid,_again.jpg".to_string(),
            phrases_amount: 1,
            contains_money: true,
        });
        articles.push(NormalizedArticle {
            title: "Older".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            description: "Nothing".to_string(),
            picture: "https://cdn.example.com/older.png".to_string(),
            phrases_amount: 0,
            contains_money: false,
        });
        articles
    }

    #[test]
    fn test_report_rows_follow_collection_order() {
        let dir = tempdir().unwrap();
        let path = write_report(&collection(), "latimes", dir.path().to_str().unwrap()).unwrap();
        assert_eq!(path, dir.path().join("latimes.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            REPORT_HEADERS.to_vec()
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            vec!["Covid, again", "2024-06-01", "Costs $40", "covid,_again.jpg", "1", "true"]
        );
        assert_eq!(&rows[1][0], "Older");
        assert_eq!(&rows[1][3], "https://cdn.example.com/older.png");
        assert_eq!(&rows[1][5], "false");
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let dir = tempdir().unwrap();
        let path = write_report(&ArticleCollection::new(), "latimes", dir.path().to_str().unwrap()).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "title,date,description,picture,phrases_amount,contains_money\n"
        );
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(write_report(&collection(), "latimes", missing.to_str().unwrap()).is_err());
    }
}
