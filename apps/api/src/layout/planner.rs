//! Page planner — runs prioritization, zone selection and placement for one page.
//!
//! Zones are visited in template-declared order. Static zones (`max_articles == 0`)
//! are recorded for the renderer and never reach the placement engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::placement::{place_in_zone, PlacedArticle, ZonePlacement};
use crate::layout::prioritizer::prioritize;
use crate::layout::registry::TemplateRegistry;
use crate::layout::zone_selector::{select_for_zone, PoolPolicy};
use crate::models::Article;

/// Placement result for a whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub template_id: String,
    pub policy: PoolPolicy,
    /// One entry per content zone, in template order.
    pub placements: Vec<ZonePlacement>,
    /// Ids of zones rendered from document metadata only.
    pub static_zones: Vec<String>,
    /// Articles that were not placed in any zone, in priority order.
    pub unplaced: Vec<Article>,
}

impl LayoutPlan {
    pub fn placed(&self) -> impl Iterator<Item = &PlacedArticle> {
        self.placements.iter().flat_map(|p| p.placed.iter())
    }

    pub fn placed_count(&self) -> usize {
        self.placements.iter().map(|p| p.placed.len()).sum()
    }
}

/// Lays out `articles` on the template `template_id`.
///
/// Fails fast with `TemplateNotFound` before any work when the id is unknown.
/// An empty article list is not an error: the plan simply has no placements.
pub fn plan_page(
    registry: &TemplateRegistry,
    template_id: &str,
    articles: Vec<Article>,
    policy: PoolPolicy,
) -> Result<LayoutPlan, AppError> {
    let template = registry.get(template_id)?;
    let prioritized = prioritize(articles);

    let mut pool: Vec<Article> = prioritized.clone();
    let mut placed_ids: HashSet<Uuid> = HashSet::new();
    let mut placements = Vec::new();
    let mut static_zones = Vec::new();

    for zone in &template.zones {
        if zone.is_static() {
            static_zones.push(zone.id.clone());
            continue;
        }

        let candidates = select_for_zone(&pool, zone);
        let placement = place_in_zone(candidates, zone, template);
        let zone_ids: HashSet<Uuid> = placement.placed.iter().map(|p| p.article.id).collect();

        if policy == PoolPolicy::Consume {
            pool.retain(|a| !zone_ids.contains(&a.id));
        }
        placed_ids.extend(zone_ids);
        placements.push(placement);
    }

    let unplaced: Vec<Article> = prioritized
        .into_iter()
        .filter(|a| !placed_ids.contains(&a.id))
        .collect();

    let plan = LayoutPlan {
        template_id: template.id.clone(),
        policy,
        placements,
        static_zones,
        unplaced,
    };

    info!(
        template_id = %plan.template_id,
        placed = plan.placed_count(),
        unplaced = plan.unplaced.len(),
        "Planned e-paper page"
    );

    Ok(plan)
}
