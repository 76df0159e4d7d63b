//! Zone Selector — filters the prioritized pool down to a zone's candidates.
//!
//! Eligibility is a pure predicate per `ZoneType` variant plus the zone's
//! restrictions. Selection never reorders: candidates keep the prioritized
//! order and are capped at `max_articles`.
//!
//! The selector does not track articles across zones. Exclusivity is a caller
//! policy (`PoolPolicy`), applied by the page planner after each zone.

use serde::{Deserialize, Serialize};

use crate::layout::template::{LayoutZone, ZoneRestrictions, ZoneType};
use crate::models::Article;

pub const LEAD_MIN_PRIORITY: i32 = 80;
pub const SIDEBAR_MIN_PRIORITY: i32 = 60;
pub const SIDEBAR_MAX_READING_MINUTES: i32 = 3;

/// Whether an article placed in one zone stays available to later zones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolPolicy {
    /// Placed articles leave the pool; no story repeats on the page.
    #[default]
    Consume,
    /// Every zone sees the full prioritized list.
    Shared,
}

impl std::str::FromStr for PoolPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consume" => Ok(PoolPolicy::Consume),
            "shared" => Ok(PoolPolicy::Shared),
            other => Err(format!("unknown pool policy '{other}' (expected consume|shared)")),
        }
    }
}

impl ZoneType {
    /// Type-specific eligibility rule.
    pub fn admits(self, article: &Article) -> bool {
        match self {
            ZoneType::Breaking => article.is_breaking,
            ZoneType::Lead | ZoneType::Feature => article.priority >= LEAD_MIN_PRIORITY,
            ZoneType::Sidebar => {
                article.priority >= SIDEBAR_MIN_PRIORITY
                    && article.reading_time_minutes <= SIDEBAR_MAX_READING_MINUTES
            }
            ZoneType::Secondary | ZoneType::Regular => true,
            ZoneType::Masthead | ZoneType::Footer | ZoneType::Weather | ZoneType::Advertisement => {
                false
            }
        }
    }
}

impl ZoneRestrictions {
    pub fn permits(&self, article: &Article) -> bool {
        if let Some(categories) = &self.categories {
            if !categories.iter().any(|c| c == &article.category) {
                return false;
            }
        }
        if self.image_required && !article.has_image() {
            return false;
        }
        true
    }
}

/// Full eligibility check for one article against one zone.
pub fn is_eligible(article: &Article, zone: &LayoutZone) -> bool {
    zone.zone_type.admits(article) && zone.restrictions.permits(article)
}

/// Returns at most `zone.max_articles` eligible articles, in input order.
pub fn select_for_zone(prioritized: &[Article], zone: &LayoutZone) -> Vec<Article> {
    prioritized
        .iter()
        .filter(|a| is_eligible(a, zone))
        .take(zone.max_articles)
        .cloned()
        .collect()
}
