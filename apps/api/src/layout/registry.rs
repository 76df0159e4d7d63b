//! Template Registry — named e-paper templates, built once at boot.
//!
//! The registry is an explicit value carried in `AppState` as
//! `Arc<TemplateRegistry>`. It is never mutated after startup, so concurrent
//! generation runs can share it freely.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::errors::AppError;
use crate::layout::font_metrics::FontFace;
use crate::layout::template::{
    ColorPalette, ColumnLayout, Grid, Insets, Justification, LayoutTemplate, LayoutZone,
    PageGeometry, Rect, Rgb, StyleGuide, TemplateCategory, TextStyle, TypographyScale,
    ZoneRestrictions, ZoneType,
};

pub const BANGLADESH_PREMIUM: &str = "bangladesh-premium";
pub const MODERN_TABLOID: &str = "modern-tabloid";
pub const COMPACT_MODERN: &str = "compact-modern";

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, LayoutTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the three built-in templates.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for template in builtin_templates() {
            // Built-ins are covered by tests; a failure here is a programming error.
            if let Err(e) = registry.register(template) {
                tracing::error!("Built-in template rejected: {e}");
            }
        }
        registry
    }

    /// Validates and inserts a template, replacing any template with the same id.
    pub fn register(&mut self, template: LayoutTemplate) -> Result<(), AppError> {
        template.validate().map_err(AppError::InvalidTemplate)?;
        info!(
            template_id = %template.id,
            zones = template.zones.len(),
            "Registered layout template"
        );
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    /// Loads a JSON array of templates from disk and registers each one.
    /// Returns the number of templates registered.
    pub fn load_json_file(&mut self, path: &Path) -> Result<usize, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::InvalidTemplate(format!("cannot read {}: {e}", path.display()))
        })?;
        let templates: Vec<LayoutTemplate> = serde_json::from_str(&raw).map_err(|e| {
            AppError::InvalidTemplate(format!("cannot parse {}: {e}", path.display()))
        })?;
        let count = templates.len();
        for template in templates {
            self.register(template)?;
        }
        Ok(count)
    }

    pub fn get(&self, id: &str) -> Result<&LayoutTemplate, AppError> {
        self.templates
            .get(id)
            .ok_or_else(|| AppError::TemplateNotFound(id.to_string()))
    }

    pub fn by_category(&self, category: TemplateCategory) -> Vec<&LayoutTemplate> {
        self.templates
            .values()
            .filter(|t| t.category == category)
            .collect()
    }

    /// All templates, ordered by id.
    pub fn list(&self) -> Vec<&LayoutTemplate> {
        self.templates.values().collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in templates
// ────────────────────────────────────────────────────────────────────────────

pub fn builtin_templates() -> Vec<LayoutTemplate> {
    vec![bangladesh_premium(), modern_tabloid(), compact_modern()]
}

fn zone(
    id: &str,
    name: &str,
    priority: u32,
    position: Rect,
    zone_type: ZoneType,
    max_articles: usize,
    columns: u32,
) -> LayoutZone {
    LayoutZone {
        id: id.to_string(),
        name: name.to_string(),
        priority,
        position,
        zone_type,
        max_articles,
        column_layout: ColumnLayout {
            columns,
            balance: columns > 1,
            flow_across: columns > 1,
        },
        restrictions: ZoneRestrictions::default(),
    }
}

fn newsprint_palette() -> ColorPalette {
    ColorPalette {
        primary_text: Rgb::new(0x1a, 0x1a, 0x1a),
        secondary_text: Rgb::new(0x55, 0x55, 0x55),
        accent: Rgb::new(0xc0, 0x1f, 0x2f),
        background: Rgb::new(0xff, 0xff, 0xff),
        rule: Rgb::new(0x33, 0x33, 0x33),
        tint: Rgb::new(0xe8, 0xe4, 0xda),
    }
}

/// Broadsheet on A3, six-column grid, serif typography.
fn bangladesh_premium() -> LayoutTemplate {
    LayoutTemplate {
        id: BANGLADESH_PREMIUM.to_string(),
        name: "Bangladesh Premium Broadsheet".to_string(),
        category: TemplateCategory::Broadsheet,
        page_geometry: PageGeometry {
            width: 842.0,
            height: 1191.0,
            margins: Insets::uniform(36.0),
            safe_area: Insets::uniform(18.0),
            bleed: 9.0,
            resolution: 300,
        },
        grid: Grid {
            columns: 6,
            column_width: 118.33,
            gutter_width: 12.0,
            baseline: 13.0,
        },
        typography_scale: TypographyScale {
            headline: TextStyle::new(FontFace::TimesBold, 26.0, 30.0, 0.0),
            subhead: TextStyle::new(FontFace::TimesBold, 16.0, 20.0, 0.0),
            body: TextStyle::new(FontFace::TimesRoman, 10.0, 13.0, 0.0),
            caption: TextStyle::new(FontFace::TimesItalic, 8.0, 10.0, 0.0),
            byline: TextStyle::new(FontFace::Helvetica, 8.0, 10.0, 0.2),
            pull_quote: TextStyle::new(FontFace::TimesItalic, 14.0, 18.0, 0.0),
        },
        color_palette: newsprint_palette(),
        #[rustfmt::skip]
        zones: vec![
            zone("masthead", "Masthead", 1, Rect::new(36.0, 36.0, 770.0, 90.0), ZoneType::Masthead, 0, 1),
            zone("breaking", "Breaking News", 2, Rect::new(36.0, 138.0, 770.0, 160.0), ZoneType::Breaking, 1, 3),
            zone("lead", "Lead Story", 3, Rect::new(36.0, 310.0, 508.0, 400.0), ZoneType::Lead, 1, 3),
            zone("sidebar", "Sidebar", 4, Rect::new(556.0, 310.0, 250.0, 400.0), ZoneType::Sidebar, 4, 1),
            zone("secondary", "Secondary Stories", 5, Rect::new(36.0, 722.0, 508.0, 220.0), ZoneType::Secondary, 3, 3),
            zone("feature", "Feature", 6, Rect::new(556.0, 722.0, 250.0, 220.0), ZoneType::Feature, 1, 1),
            zone("regular", "News Round-up", 7, Rect::new(36.0, 954.0, 770.0, 146.0), ZoneType::Regular, 6, 6),
            zone("footer", "Footer", 8, Rect::new(36.0, 1112.0, 770.0, 43.0), ZoneType::Footer, 0, 1),
        ],
        style_guide: StyleGuide {
            min_text_size: 8.0,
            max_text_size: 12.0,
            min_line_spacing: 1.2,
            justification: Justification::Justify,
            paragraph_spacing: 6.0,
            hyphenation: false,
        },
    }
}

/// Tabloid on 11×17in, five-column grid, sans-serif typography.
fn modern_tabloid() -> LayoutTemplate {
    let mut feature = zone(
        "feature",
        "Feature Spread",
        5,
        Rect::new(30.0, 726.0, 480.0, 300.0),
        ZoneType::Feature,
        2,
        2,
    );
    feature.restrictions.image_required = true;

    LayoutTemplate {
        id: MODERN_TABLOID.to_string(),
        name: "Modern Tabloid".to_string(),
        category: TemplateCategory::Tabloid,
        page_geometry: PageGeometry {
            width: 792.0,
            height: 1224.0,
            margins: Insets::uniform(30.0),
            safe_area: Insets::uniform(15.0),
            bleed: 9.0,
            resolution: 300,
        },
        grid: Grid {
            columns: 5,
            column_width: 136.8,
            gutter_width: 12.0,
            baseline: 12.5,
        },
        typography_scale: TypographyScale {
            headline: TextStyle::new(FontFace::HelveticaBold, 24.0, 28.0, 0.0),
            subhead: TextStyle::new(FontFace::HelveticaBold, 15.0, 18.0, 0.0),
            body: TextStyle::new(FontFace::Helvetica, 9.5, 12.5, 0.0),
            caption: TextStyle::new(FontFace::Helvetica, 7.5, 9.5, 0.0),
            byline: TextStyle::new(FontFace::HelveticaBold, 7.5, 9.5, 0.3),
            pull_quote: TextStyle::new(FontFace::TimesItalic, 16.0, 20.0, 0.0),
        },
        color_palette: ColorPalette {
            accent: Rgb::new(0xe6, 0x39, 0x46),
            tint: Rgb::new(0xf1, 0xfa, 0xee),
            ..newsprint_palette()
        },
        #[rustfmt::skip]
        zones: vec![
            zone("masthead", "Masthead", 1, Rect::new(30.0, 30.0, 732.0, 80.0), ZoneType::Masthead, 0, 1),
            zone("breaking", "Breaking Banner", 2, Rect::new(30.0, 122.0, 732.0, 150.0), ZoneType::Breaking, 1, 2),
            zone("lead", "Cover Story", 3, Rect::new(30.0, 284.0, 480.0, 430.0), ZoneType::Lead, 1, 2),
            zone("sidebar", "Quick Reads", 4, Rect::new(522.0, 284.0, 240.0, 430.0), ZoneType::Sidebar, 3, 1),
            feature,
            zone("secondary", "More News", 6, Rect::new(522.0, 726.0, 240.0, 300.0), ZoneType::Secondary, 2, 1),
            zone("advertisement", "Advertisement", 7, Rect::new(30.0, 1038.0, 732.0, 110.0), ZoneType::Advertisement, 0, 1),
            zone("footer", "Footer", 8, Rect::new(30.0, 1160.0, 732.0, 34.0), ZoneType::Footer, 0, 1),
        ],
        style_guide: StyleGuide {
            min_text_size: 7.5,
            max_text_size: 11.0,
            min_line_spacing: 1.25,
            justification: Justification::Left,
            paragraph_spacing: 5.0,
            hyphenation: false,
        },
    }
}

/// Compact A4 edition, four-column grid.
fn compact_modern() -> LayoutTemplate {
    LayoutTemplate {
        id: COMPACT_MODERN.to_string(),
        name: "Compact Modern".to_string(),
        category: TemplateCategory::Compact,
        page_geometry: PageGeometry {
            width: 595.0,
            height: 842.0,
            margins: Insets::uniform(28.0),
            safe_area: Insets::uniform(14.0),
            bleed: 6.0,
            resolution: 300,
        },
        grid: Grid {
            columns: 4,
            column_width: 127.25,
            gutter_width: 10.0,
            baseline: 11.5,
        },
        typography_scale: TypographyScale {
            headline: TextStyle::new(FontFace::HelveticaBold, 20.0, 24.0, 0.0),
            subhead: TextStyle::new(FontFace::HelveticaBold, 13.0, 16.0, 0.0),
            body: TextStyle::new(FontFace::TimesRoman, 9.0, 11.5, 0.0),
            caption: TextStyle::new(FontFace::TimesItalic, 7.0, 9.0, 0.0),
            byline: TextStyle::new(FontFace::Helvetica, 7.0, 9.0, 0.2),
            pull_quote: TextStyle::new(FontFace::TimesItalic, 12.0, 15.0, 0.0),
        },
        color_palette: newsprint_palette(),
        #[rustfmt::skip]
        zones: vec![
            zone("masthead", "Masthead", 1, Rect::new(28.0, 28.0, 539.0, 60.0), ZoneType::Masthead, 0, 1),
            zone("breaking", "Breaking", 2, Rect::new(28.0, 100.0, 539.0, 110.0), ZoneType::Breaking, 1, 2),
            zone("lead", "Lead", 3, Rect::new(28.0, 222.0, 539.0, 250.0), ZoneType::Lead, 1, 3),
            zone("secondary", "Secondary", 4, Rect::new(28.0, 484.0, 355.0, 180.0), ZoneType::Secondary, 2, 2),
            zone("sidebar", "In Brief", 5, Rect::new(395.0, 484.0, 172.0, 180.0), ZoneType::Sidebar, 3, 1),
            zone("regular", "Round-up", 6, Rect::new(28.0, 676.0, 355.0, 100.0), ZoneType::Regular, 3, 2),
            zone("weather", "Weather", 7, Rect::new(395.0, 676.0, 172.0, 100.0), ZoneType::Weather, 0, 1),
            zone("footer", "Footer", 8, Rect::new(28.0, 788.0, 539.0, 26.0), ZoneType::Footer, 0, 1),
        ],
        style_guide: StyleGuide {
            min_text_size: 8.0,
            max_text_size: 11.0,
            min_line_spacing: 1.2,
            justification: Justification::Justify,
            paragraph_spacing: 4.0,
            hyphenation: false,
        },
    }
}
