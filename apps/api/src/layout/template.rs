//! Template data model — page geometry, grid, typography, palette and zones.
//!
//! Templates are plain configuration: built once (built-ins or JSON), never
//! mutated during a generation run. All lengths are PDF points with the origin
//! at the top-left corner of the page; the renderer flips the y axis.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontFace;

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Axis-aligned box, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True if `other` lies entirely inside `self` (edges may touch).
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right() + f32::EPSILON
            && other.bottom() <= self.bottom() + f32::EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const fn uniform(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Insets,
    pub safe_area: Insets,
    pub bleed: f32,
    /// Raster resolution hint for image assets, dots per inch.
    pub resolution: u32,
}

impl PageGeometry {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub columns: u32,
    pub column_width: f32,
    pub gutter_width: f32,
    pub baseline: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Typography & colour
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font: FontFace,
    pub size: f32,
    /// Absolute line height in points.
    pub line_height: f32,
    /// Extra space between characters in points.
    #[serde(default)]
    pub tracking: f32,
}

impl TextStyle {
    pub const fn new(font: FontFace, size: f32, line_height: f32, tracking: f32) -> Self {
        Self {
            font,
            size,
            line_height,
            tracking,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyScale {
    pub headline: TextStyle,
    pub subhead: TextStyle,
    pub body: TextStyle,
    pub caption: TextStyle,
    pub byline: TextStyle,
    pub pull_quote: TextStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to 0.0 – 1.0 for PDF colour operators.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub primary_text: Rgb,
    pub secondary_text: Rgb,
    pub accent: Rgb,
    pub background: Rgb,
    pub rule: Rgb,
    pub tint: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    Left,
    Justify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleGuide {
    pub min_text_size: f32,
    pub max_text_size: f32,
    pub min_line_spacing: f32,
    pub justification: Justification,
    pub paragraph_spacing: f32,
    pub hyphenation: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Zones
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Masthead,
    Breaking,
    Lead,
    Secondary,
    Sidebar,
    Regular,
    Feature,
    Weather,
    Footer,
    Advertisement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    pub columns: u32,
    #[serde(default)]
    pub balance: bool,
    #[serde(default)]
    pub flow_across: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRestrictions {
    #[serde(default)]
    pub min_font_size: Option<f32>,
    #[serde(default)]
    pub image_required: bool,
    #[serde(default)]
    pub text_only: bool,
    /// Category allow-list. `None` admits every category.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutZone {
    pub id: String,
    pub name: String,
    /// Documentation ordering only; zones are processed in declared order.
    pub priority: u32,
    pub position: Rect,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    /// 0 marks a static zone (masthead, footer) that never receives articles.
    pub max_articles: usize,
    pub column_layout: ColumnLayout,
    #[serde(default)]
    pub restrictions: ZoneRestrictions,
}

impl LayoutZone {
    pub fn is_static(&self) -> bool {
        self.max_articles == 0
    }

    pub fn columns(&self) -> u32 {
        self.column_layout.columns.max(1)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Broadsheet,
    Tabloid,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTemplate {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    pub page_geometry: PageGeometry,
    pub grid: Grid,
    pub typography_scale: TypographyScale,
    pub color_palette: ColorPalette,
    pub zones: Vec<LayoutZone>,
    pub style_guide: StyleGuide,
}

impl LayoutTemplate {
    pub fn zone(&self, id: &str) -> Option<&LayoutZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Body style after applying the style guide's size bounds and the zone's
    /// `minFontSize` restriction. Placement and rendering both use this.
    pub fn effective_body_style(&self, zone: &LayoutZone) -> TextStyle {
        let mut style = self.typography_scale.body;
        let guide = &self.style_guide;
        style.size = style.size.clamp(guide.min_text_size, guide.max_text_size);
        if let Some(min) = zone.restrictions.min_font_size {
            style.size = style.size.max(min);
        }
        style.line_height = style.line_height.max(style.size * guide.min_line_spacing);
        style
    }

    /// Structural checks applied on registration. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("template id is empty".to_string());
        }
        if self.grid.columns < 1 {
            return Err(format!("template '{}': grid.columns must be >= 1", self.id));
        }
        self.validate_typography()?;
        let bounds = self.page_geometry.bounds();
        let mut seen = std::collections::HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.id.as_str()) {
                return Err(format!(
                    "template '{}': duplicate zone id '{}'",
                    self.id, zone.id
                ));
            }
            if zone.column_layout.columns < 1 {
                return Err(format!(
                    "template '{}': zone '{}' has no columns",
                    self.id, zone.id
                ));
            }
            if !bounds.contains(&zone.position) {
                return Err(format!(
                    "template '{}': zone '{}' lies outside the page",
                    self.id, zone.id
                ));
            }
        }
        Ok(())
    }

    fn validate_typography(&self) -> Result<(), String> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let scale = &self.typography_scale;
        for (name, style) in [
            ("headline", &scale.headline),
            ("subhead", &scale.subhead),
            ("body", &scale.body),
            ("caption", &scale.caption),
            ("byline", &scale.byline),
            ("pullQuote", &scale.pull_quote),
        ] {
            let valid = positive(style.size)
                && positive(style.line_height)
                && style.tracking.is_finite();
            if !valid {
                return Err(format!(
                    "template '{}': {name} style needs a positive size and line height",
                    self.id
                ));
            }
        }

        let guide = &self.style_guide;
        if !positive(guide.min_text_size) || !positive(guide.max_text_size) {
            return Err(format!(
                "template '{}': style guide text sizes must be positive",
                self.id
            ));
        }
        if guide.min_text_size > guide.max_text_size {
            return Err(format!(
                "template '{}': minTextSize {} exceeds maxTextSize {}",
                self.id, guide.min_text_size, guide.max_text_size
            ));
        }
        if !positive(guide.min_line_spacing) {
            return Err(format!(
                "template '{}': minLineSpacing must be positive",
                self.id
            ));
        }
        for zone in &self.zones {
            if let Some(min) = zone.restrictions.min_font_size {
                if !positive(min) {
                    return Err(format!(
                        "template '{}': zone '{}' minFontSize must be positive",
                        self.id, zone.id
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::registry::builtin_templates;

    #[test]
    fn test_rect_contains_edges() {
        let page = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(page.contains(&Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(!page.contains(&Rect::new(50.0, 50.0, 60.0, 10.0)));
    }

    #[test]
    fn test_builtin_templates_validate() {
        for template in builtin_templates() {
            assert_eq!(template.validate(), Ok(()), "{} invalid", template.id);
        }
    }

    #[test]
    fn test_validate_rejects_zone_outside_page() {
        let mut template = builtin_templates().remove(0);
        template.zones[1].position.x = template.page_geometry.width;
        assert!(template.validate().unwrap_err().contains("outside the page"));
    }

    #[test]
    fn test_validate_rejects_inverted_text_bounds() {
        let mut template = builtin_templates().remove(0);
        template.style_guide.min_text_size = 12.0;
        template.style_guide.max_text_size = 8.0;
        assert!(template.validate().unwrap_err().contains("exceeds maxTextSize"));
    }

    #[test]
    fn test_validate_rejects_non_finite_or_zero_styles() {
        let mut template = builtin_templates().remove(0);
        template.style_guide.max_text_size = f32::NAN;
        assert!(template.validate().is_err());

        let mut template = builtin_templates().remove(0);
        template.typography_scale.body.line_height = 0.0;
        assert!(template.validate().unwrap_err().contains("body style"));

        let mut template = builtin_templates().remove(0);
        template.typography_scale.headline.size = f32::INFINITY;
        assert!(template.validate().unwrap_err().contains("headline style"));
    }

    #[test]
    fn test_validate_rejects_duplicate_zone_ids() {
        let mut template = builtin_templates().remove(0);
        let dup = template.zones[1].clone();
        template.zones.push(dup);
        assert!(template.validate().unwrap_err().contains("duplicate zone id"));
    }

    #[test]
    fn test_effective_body_style_honours_min_font_size() {
        let mut template = builtin_templates().remove(0);
        let base = template.typography_scale.body.size;
        let zone = &mut template.zones[1];
        zone.restrictions.min_font_size = Some(base + 3.0);
        let zone = zone.clone();
        let style = template.effective_body_style(&zone);
        assert!((style.size - (base + 3.0)).abs() < 1e-4);
        assert!(style.line_height >= style.size * template.style_guide.min_line_spacing);
    }

    #[test]
    fn test_zone_type_serializes_lowercase() {
        let json = serde_json::to_string(&ZoneType::Advertisement).unwrap();
        assert_eq!(json, "\"advertisement\"");
    }
}
