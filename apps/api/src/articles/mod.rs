//! Article Source — where edition articles come from.
//!
//! The layout engine only sees `Vec<Article>`. `AppState` holds an
//! `Arc<dyn ArticleSource>` so the edition handler works the same against
//! Postgres in production and an in-memory list in tests.

pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::Article;

pub use postgres::PgArticleSource;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Published articles for the calendar day `date` (UTC), newest first,
    /// at most `limit` rows.
    async fn fetch_for_edition(&self, date: NaiveDate, limit: i64)
        -> Result<Vec<Article>, AppError>;
}

/// Fixed article list, filtered by publication day like the database query.
#[cfg(test)]
pub struct StaticArticleSource {
    pub articles: Vec<Article>,
}

#[cfg(test)]
#[async_trait]
impl ArticleSource for StaticArticleSource {
    async fn fetch_for_edition(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Article>, AppError> {
        let mut day: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| a.published_at.date_naive() == date)
            .cloned()
            .collect();
        day.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        day.truncate(limit.max(0) as usize);
        Ok(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::fixtures::article;

    #[tokio::test]
    async fn test_static_source_filters_by_day_and_limit() {
        let mut yesterday = article("old", 90, false, 0);
        yesterday.published_at -= chrono::Duration::days(1);
        let source = StaticArticleSource {
            articles: vec![
                yesterday,
                article("first", 50, false, 0),
                article("second", 50, false, 30),
                article("third", 50, false, 60),
            ],
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let fetched = source.fetch_for_edition(date, 2).await.unwrap();
        let titles: Vec<&str> = fetched.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second"]);
    }
}
