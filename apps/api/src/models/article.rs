use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A published news article as supplied by the content store.
///
/// Read-only to the layout engine. `content` is the plain-text body; an empty
/// body is legal and estimates to zero body lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Higher is more important.
    pub priority: i32,
    #[sqlx(rename = "reading_time")]
    #[serde(alias = "readingTime")]
    pub reading_time_minutes: i32,
    #[serde(default)]
    pub is_breaking: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Article {
    /// True when the article carries a non-blank image URL.
    pub fn has_image(&self) -> bool {
        self.image_url
            .as_deref()
            .map(|url| !url.trim().is_empty())
            .unwrap_or(false)
    }

    /// Byline text drawn under the headline.
    pub fn byline(&self) -> String {
        format!("{} | {}", self.author, self.category)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Builds a test article. `minutes_after` offsets `published_at` from a fixed epoch
    /// so recency comparisons are deterministic.
    pub fn article(title: &str, priority: i32, is_breaking: bool, minutes_after: i64) -> Article {
        Article {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: "ঢাকা শহরে আজ সকালে ভারী বৃষ্টি হয়েছে। ".repeat(4),
            category: "জাতীয়".to_string(),
            author: "নিজস্ব প্রতিবেদক".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap()
                + chrono::Duration::minutes(minutes_after),
            image_url: None,
            priority,
            reading_time_minutes: 2,
            is_breaking,
            tags: vec![],
        }
    }
}
