use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sqlx::PgPool;
use tracing::info;

use crate::articles::ArticleSource;
use crate::errors::AppError;
use crate::models::Article;

/// Reads from the newsroom `articles` table.
#[derive(Clone)]
pub struct PgArticleSource {
    pool: PgPool,
}

impl PgArticleSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleSource for PgArticleSource {
    async fn fetch_for_edition(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Article>, AppError> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::Validation(format!("invalid edition date {date}")))?
            .and_utc();
        let end = start + Duration::days(1);

        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, category, author, published_at, image_url,
                   priority, reading_time, is_breaking,
                   COALESCE(tags, '{}') AS tags
            FROM articles
            WHERE status = 'published'
              AND published_at >= $1
              AND published_at < $2
            ORDER BY published_at DESC
            LIMIT $3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        info!(%date, count = articles.len(), "Fetched edition articles");
        Ok(articles)
    }
}
