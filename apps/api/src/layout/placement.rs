//! Column Placement Engine — greedy, column-major placement inside one zone.
//!
//! # Algorithm
//! - column width = (zone width − (columns − 1) × gutter) / columns
//! - cursor starts at column 0, top of the zone
//! - per article: pick a span, estimate its height, move to the next column
//!   when the block would cross the zone bottom, stop once the span no longer
//!   fits in the remaining columns
//! - placed blocks are separated by `ARTICLE_SPACING`
//!
//! Heights are estimates (see `font_metrics`). Zones are laid out
//! independently; there is no cross-zone collision detection.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::font_metrics::{chars_per_line, estimate_text_block_height, wrap_lines};
use crate::layout::template::{LayoutTemplate, LayoutZone, Rect, TextStyle, ZoneType};
use crate::models::Article;

/// Vertical gap between consecutive blocks in a column, in points.
pub const ARTICLE_SPACING: f32 = 12.0;
/// Image height as a fraction of block width (5:3 aspect ratio).
pub const IMAGE_ASPECT: f32 = 0.6;
/// Headline slots reserved per block.
pub const HEADLINE_LINES: f32 = 2.0;

/// Priority at which a non-breaking article spans two columns.
const WIDE_SPAN_PRIORITY: i32 = 85;
/// Priority at which an article's typography is scaled up outside feature zones.
const EMPHASIS_PRIORITY: i32 = 80;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// An article with its absolute box on the page. `bounds.height` is estimated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedArticle {
    pub article: Article,
    pub bounds: Rect,
    pub zone_id: String,
    pub column: u32,
    pub column_span: u32,
    pub font_scale: f32,
}

/// Result of laying out one zone. Nothing is dropped silently: every candidate
/// ends up in exactly one of `placed` or `unplaced`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePlacement {
    pub zone_id: String,
    pub placed: Vec<PlacedArticle>,
    pub unplaced: Vec<Article>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// Width of one column inside the zone.
pub fn column_width(zone: &LayoutZone, gutter: f32) -> f32 {
    let columns = zone.columns() as f32;
    (zone.position.width - (columns - 1.0) * gutter) / columns
}

/// Columns an article spans: 3 for breaking news, 2 for priority ≥ 85, else 1;
/// never more than the zone has.
pub fn column_span_for(article: &Article, zone: &LayoutZone) -> u32 {
    let wanted = if article.is_breaking {
        3
    } else if article.priority >= WIDE_SPAN_PRIORITY {
        2
    } else {
        1
    };
    wanted.min(zone.columns())
}

/// Headline scale factor. Zone type wins over article priority.
pub fn font_scale_for(article: &Article, zone: &LayoutZone) -> f32 {
    match zone.zone_type {
        ZoneType::Breaking => 1.2,
        ZoneType::Feature | ZoneType::Lead => 1.1,
        _ if article.priority >= EMPHASIS_PRIORITY => 1.05,
        _ => 1.0,
    }
}

/// Width of a block spanning `span` columns, gutters included.
pub fn span_width(column_width: f32, gutter: f32, span: u32) -> f32 {
    column_width * span as f32 + gutter * (span.saturating_sub(1)) as f32
}

/// Image area reserved inside a block of `width`, zero for text-only zones.
pub fn image_height(article: &Article, zone: &LayoutZone, width: f32) -> f32 {
    if article.has_image() && !zone.restrictions.text_only {
        width * IMAGE_ASPECT
    } else {
        0.0
    }
}

/// Headline style for a block: size and line height both scaled.
pub fn scaled_headline(template: &LayoutTemplate, font_scale: f32) -> TextStyle {
    let mut style = template.typography_scale.headline;
    style.size *= font_scale;
    style.line_height *= font_scale;
    style
}

/// Vertical layout of one article block. Placement sizes the box with
/// `height()` and the renderer draws exactly these lines, so the two agree.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleBlock {
    pub headline: TextStyle,
    /// At most `HEADLINE_LINES`; the headline slot is reserved in full either way.
    pub headline_lines: Vec<String>,
    pub byline: TextStyle,
    pub image_height: f32,
    pub body: TextStyle,
    pub body_lines: Vec<String>,
    /// Reserved body height from `estimate_text_block_height`.
    pub body_height: f32,
}

impl ArticleBlock {
    pub fn new(
        article: &Article,
        width: f32,
        zone: &LayoutZone,
        template: &LayoutTemplate,
        font_scale: f32,
    ) -> Self {
        let headline = scaled_headline(template, font_scale);
        let mut headline_lines = wrap_lines(&article.title, chars_per_line(width, &headline));
        headline_lines.truncate(HEADLINE_LINES as usize);

        let body = template.effective_body_style(zone);
        Self {
            headline,
            headline_lines,
            byline: template.typography_scale.byline,
            image_height: image_height(article, zone, width),
            body_lines: wrap_lines(&article.content, chars_per_line(width, &body)),
            body_height: estimate_text_block_height(&article.content, width, &body),
            body,
        }
    }

    pub fn headline_height(&self) -> f32 {
        HEADLINE_LINES * self.headline.line_height
    }

    /// Headline slot, one byline line, image area, then the body.
    pub fn height(&self) -> f32 {
        self.headline_height() + self.byline.line_height + self.image_height + self.body_height
    }
}

/// Estimated block height for `article` at `width` in `zone`.
pub fn estimate_article_height(
    article: &Article,
    width: f32,
    zone: &LayoutZone,
    template: &LayoutTemplate,
) -> f32 {
    ArticleBlock::new(article, width, zone, template, font_scale_for(article, zone)).height()
}

// ────────────────────────────────────────────────────────────────────────────
// Placement
// ────────────────────────────────────────────────────────────────────────────

/// Places `candidates` into `zone` in order. Once a block no longer fits, the
/// rest of the candidates are returned as `unplaced`.
pub fn place_in_zone(
    candidates: Vec<Article>,
    zone: &LayoutZone,
    template: &LayoutTemplate,
) -> ZonePlacement {
    let gutter = template.grid.gutter_width;
    let columns = zone.columns();
    let col_width = column_width(zone, gutter);
    let zone_top = zone.position.y;
    let zone_bottom = zone.position.bottom();

    let mut current_column = 0u32;
    let mut current_y = zone_top;
    let mut placed = Vec::with_capacity(candidates.len());
    let mut remaining = candidates.into_iter();

    while let Some(article) = remaining.next() {
        let span = column_span_for(&article, zone);
        let width = span_width(col_width, gutter, span);
        let font_scale = font_scale_for(&article, zone);
        let height = estimate_article_height(&article, width, zone, template);

        if current_y + height > zone_bottom {
            current_column += 1;
            current_y = zone_top;
        }

        if current_column + span > columns {
            let unplaced: Vec<Article> = std::iter::once(article).chain(remaining).collect();
            warn!(
                zone_id = %zone.id,
                placed = placed.len(),
                dropped = unplaced.len(),
                "Zone full: candidates left unplaced"
            );
            return ZonePlacement {
                zone_id: zone.id.clone(),
                placed,
                unplaced,
            };
        }

        let x = zone.position.x + current_column as f32 * (col_width + gutter);
        debug!(
            zone_id = %zone.id,
            article_id = %article.id,
            column = current_column,
            span,
            height,
            "Placed article"
        );
        placed.push(PlacedArticle {
            font_scale,
            bounds: Rect::new(x, current_y, width, height),
            zone_id: zone.id.clone(),
            column: current_column,
            column_span: span,
            article,
        });
        current_y += height + ARTICLE_SPACING;
    }

    ZonePlacement {
        zone_id: zone.id.clone(),
        placed,
        unplaced: Vec::new(),
    }
}
