//! Zone Fill Analysis — how well each zone is used after placement.
//!
//! Placement never fails on an imperfect layout; this report surfaces what it
//! glossed over (dropped candidates, near-empty zones) so editors can react.
//!
//! # Zone fill rules
//! - nothing placed                 → Empty
//! - candidates left unplaced       → Overflowing
//! - fill below `MIN_ACCEPTABLE_FILL` → Underfilled
//! - otherwise                      → Acceptable

use serde::{Deserialize, Serialize};

use crate::layout::placement::ZonePlacement;
use crate::layout::template::LayoutZone;

pub const MIN_ACCEPTABLE_FILL: f32 = 0.60;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneFillVerdict {
    Empty,
    Underfilled,
    Acceptable,
    Overflowing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneFillAnalysis {
    pub zone_id: String,
    pub placed_count: usize,
    pub unplaced_count: usize,
    /// Lowest estimated block bottom per column, relative to the zone top.
    pub column_extents: Vec<f32>,
    /// Column area of the zone: height × columns.
    pub capacity: f32,
    /// Sum of block heights × spans over `capacity`. May exceed 1.0 when
    /// estimates overrun the zone.
    pub fill_ratio: f32,
    pub verdict: ZoneFillVerdict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFillAnalysis {
    pub zones: Vec<ZoneFillAnalysis>,
    pub total_placed: usize,
    pub total_unplaced: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

pub fn analyze_zone_fill(zone: &LayoutZone, placement: &ZonePlacement) -> ZoneFillAnalysis {
    let columns = zone.columns() as usize;
    let mut column_extents = vec![0.0_f32; columns];
    let mut used_area = 0.0_f32;

    for placed in &placement.placed {
        let bottom = placed.bounds.bottom() - zone.position.y;
        let first = placed.column as usize;
        let last = (first + placed.column_span as usize).min(columns);
        for extent in &mut column_extents[first.min(columns)..last] {
            *extent = extent.max(bottom);
        }
        used_area += placed.bounds.height * placed.column_span as f32;
    }

    let capacity = zone.position.height * columns as f32;
    let fill_ratio = if capacity > 0.0 {
        used_area / capacity
    } else {
        0.0
    };

    let verdict = if placement.placed.is_empty() {
        ZoneFillVerdict::Empty
    } else if !placement.unplaced.is_empty() {
        ZoneFillVerdict::Overflowing
    } else if fill_ratio < MIN_ACCEPTABLE_FILL {
        ZoneFillVerdict::Underfilled
    } else {
        ZoneFillVerdict::Acceptable
    };

    ZoneFillAnalysis {
        zone_id: zone.id.clone(),
        placed_count: placement.placed.len(),
        unplaced_count: placement.unplaced.len(),
        column_extents,
        capacity,
        fill_ratio,
        verdict,
    }
}

/// Analyzes every placement against its zone. Placements whose zone id is not
/// in `zones` are skipped.
pub fn analyze_page_fill(zones: &[LayoutZone], placements: &[ZonePlacement]) -> PageFillAnalysis {
    let analyses: Vec<ZoneFillAnalysis> = placements
        .iter()
        .filter_map(|p| {
            zones
                .iter()
                .find(|z| z.id == p.zone_id)
                .map(|z| analyze_zone_fill(z, p))
        })
        .collect();

    PageFillAnalysis {
        total_placed: analyses.iter().map(|a| a.placed_count).sum(),
        total_unplaced: analyses.iter().map(|a| a.unplaced_count).sum(),
        zones: analyses,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::placement::PlacedArticle;
    use crate::layout::template::{ColumnLayout, Rect, ZoneRestrictions, ZoneType};
    use crate::models::article::fixtures::article;

    fn make_zone() -> LayoutZone {
        LayoutZone {
            id: "secondary".to_string(),
            name: "Secondary".to_string(),
            priority: 1,
            position: Rect::new(0.0, 100.0, 212.0, 200.0),
            zone_type: ZoneType::Secondary,
            max_articles: 4,
            column_layout: ColumnLayout {
                columns: 2,
                balance: true,
                flow_across: true,
            },
            restrictions: ZoneRestrictions::default(),
        }
    }

    fn placed(column: u32, span: u32, y: f32, height: f32) -> PlacedArticle {
        PlacedArticle {
            article: article("a", 50, false, 0),
            bounds: Rect::new(column as f32 * 112.0, y, 100.0 * span as f32, height),
            zone_id: "secondary".to_string(),
            column,
            column_span: span,
            font_scale: 1.0,
        }
    }

    #[test]
    fn test_empty_zone_verdict() {
        let placement = ZonePlacement {
            zone_id: "secondary".to_string(),
            placed: vec![],
            unplaced: vec![],
        };
        let analysis = analyze_zone_fill(&make_zone(), &placement);
        assert_eq!(analysis.verdict, ZoneFillVerdict::Empty);
        assert_eq!(analysis.fill_ratio, 0.0);
        assert_eq!(analysis.column_extents, vec![0.0, 0.0]);
    }

    #[test]
    fn test_overflowing_when_candidates_dropped() {
        let placement = ZonePlacement {
            zone_id: "secondary".to_string(),
            placed: vec![placed(0, 1, 100.0, 190.0)],
            unplaced: vec![article("late", 40, false, 0)],
        };
        let analysis = analyze_zone_fill(&make_zone(), &placement);
        assert_eq!(analysis.verdict, ZoneFillVerdict::Overflowing);
        assert_eq!(analysis.unplaced_count, 1);
    }

    #[test]
    fn test_underfilled_zone() {
        // 80 × 1 column of a 400 capacity → 0.2
        let placement = ZonePlacement {
            zone_id: "secondary".to_string(),
            placed: vec![placed(0, 1, 100.0, 80.0)],
            unplaced: vec![],
        };
        let analysis = analyze_zone_fill(&make_zone(), &placement);
        assert_eq!(analysis.verdict, ZoneFillVerdict::Underfilled);
        assert!((analysis.fill_ratio - 0.2).abs() < 1e-4);
        assert_eq!(analysis.column_extents, vec![80.0, 0.0]);
    }

    #[test]
    fn test_spanning_block_extends_both_columns() {
        let placement = ZonePlacement {
            zone_id: "secondary".to_string(),
            placed: vec![placed(0, 2, 100.0, 150.0), placed(0, 1, 262.0, 30.0)],
            unplaced: vec![],
        };
        let analysis = analyze_zone_fill(&make_zone(), &placement);
        assert_eq!(analysis.column_extents, vec![192.0, 150.0]);
        // (150 × 2 + 30) / 400
        assert!((analysis.fill_ratio - 0.825).abs() < 1e-4);
        assert_eq!(analysis.verdict, ZoneFillVerdict::Acceptable);
    }

    #[test]
    fn test_page_fill_totals() {
        let zone = make_zone();
        let placements = vec![
            ZonePlacement {
                zone_id: "secondary".to_string(),
                placed: vec![placed(0, 1, 100.0, 80.0)],
                unplaced: vec![article("x", 1, false, 0), article("y", 1, false, 0)],
            },
            ZonePlacement {
                zone_id: "unknown".to_string(),
                placed: vec![placed(0, 1, 100.0, 80.0)],
                unplaced: vec![],
            },
        ];
        let page = analyze_page_fill(&[zone], &placements);
        assert_eq!(page.zones.len(), 1);
        assert_eq!(page.total_placed, 1);
        assert_eq!(page.total_unplaced, 2);
    }
}
