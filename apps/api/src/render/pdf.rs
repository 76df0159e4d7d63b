//! PDF assembly for a planned e-paper page.
//!
//! Page coordinates in templates are top-left based; `Canvas` flips them into
//! PDF user space. Articles are drawn from the same `ArticleBlock` that sized
//! their box during placement, and body text is clipped to that box.

use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Name, Pdf, Rect as PdfRect, Ref, Str, TextStr};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::layout::font_metrics::{estimated_line_width, FontFace};
use crate::layout::placement::{ArticleBlock, PlacedArticle};
use crate::layout::planner::LayoutPlan;
use crate::layout::template::{
    Justification, LayoutTemplate, LayoutZone, Rect, Rgb, TextStyle, ZoneType,
};
use crate::render::encoding::{count_unmappable, encode_win_ansi};
use crate::render::{DocumentMeta, RenderOptions};

/// Baseline offset inside a line box, as a fraction of the line height.
const BASELINE_RATIO: f32 = 0.8;
const RULE_WIDTH: f32 = 0.75;
const HEAVY_RULE_WIDTH: f32 = 2.5;
/// Masthead title size relative to the headline style.
const MASTHEAD_SCALE: f32 = 1.6;

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

struct Canvas {
    content: Content,
    page_height: f32,
    unmappable: usize,
}

impl Canvas {
    fn new(page_height: f32) -> Self {
        Self {
            content: Content::new(),
            page_height,
            unmappable: 0,
        }
    }

    fn flip(&self, y: f32) -> f32 {
        self.page_height - y
    }

    fn fill_rect(&mut self, rect: &Rect, color: Rgb) {
        let (r, g, b) = color.to_unit();
        let y = self.flip(rect.bottom());
        self.content
            .set_fill_rgb(r, g, b)
            .rect(rect.x, y, rect.width, rect.height)
            .fill_nonzero();
    }

    fn stroke_rect(&mut self, rect: &Rect, color: Rgb, width: f32) {
        let (r, g, b) = color.to_unit();
        let y = self.flip(rect.bottom());
        self.content
            .set_stroke_rgb(r, g, b)
            .set_line_width(width)
            .rect(rect.x, y, rect.width, rect.height)
            .stroke();
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32, color: Rgb, width: f32) {
        let (r, g, b) = color.to_unit();
        let y = self.flip(y);
        self.content
            .set_stroke_rgb(r, g, b)
            .set_line_width(width)
            .move_to(x1, y)
            .line_to(x2, y)
            .stroke();
    }

    /// Draws one line of text whose line box starts at `top`.
    fn text_line(
        &mut self,
        text: &str,
        x: f32,
        top: f32,
        style: &TextStyle,
        color: Rgb,
        word_spacing: f32,
    ) {
        self.unmappable += count_unmappable(text);
        let bytes = encode_win_ansi(text);
        let (r, g, b) = color.to_unit();
        let baseline = self.flip(top + style.line_height * BASELINE_RATIO);
        self.content
            .begin_text()
            .set_font(Name(style.font.resource_name().as_bytes()), style.size)
            .set_fill_rgb(r, g, b)
            .set_char_spacing(style.tracking)
            .set_word_spacing(word_spacing)
            .next_line(x, baseline)
            .show(Str(&bytes))
            .end_text();
    }

    fn finish(self) -> (Vec<u8>, usize) {
        (self.content.finish(), self.unmappable)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Renders the plan onto one PDF page and returns the serialized document.
pub fn render_pdf(
    template: &LayoutTemplate,
    plan: &LayoutPlan,
    meta: &DocumentMeta,
    options: &RenderOptions,
) -> Result<Vec<u8>, AppError> {
    if plan.template_id != template.id {
        return Err(AppError::Render(format!(
            "plan was built for template '{}', not '{}'",
            plan.template_id, template.id
        )));
    }

    let page = &template.page_geometry;
    let mut canvas = Canvas::new(page.height);
    canvas.fill_rect(&page.bounds(), template.color_palette.background);

    for zone_id in &plan.static_zones {
        let zone = find_zone(template, zone_id)?;
        draw_static_zone(&mut canvas, template, zone, meta);
    }

    for placed in plan.placed() {
        let zone = find_zone(template, &placed.zone_id)?;
        draw_article(&mut canvas, template, zone, placed);
    }

    let (raw, unmappable) = canvas.finish();
    if unmappable > 0 {
        warn!(
            template_id = %template.id,
            replaced = unmappable,
            "Characters outside WinAnsi were replaced in the rendered page"
        );
    }

    let bytes = assemble(template, &raw, meta, options);
    debug!(
        template_id = %template.id,
        placed = plan.placed_count(),
        size = bytes.len(),
        "Rendered e-paper PDF"
    );
    Ok(bytes)
}

fn find_zone<'a>(template: &'a LayoutTemplate, zone_id: &str) -> Result<&'a LayoutZone, AppError> {
    template.zone(zone_id).ok_or_else(|| {
        AppError::Render(format!(
            "zone '{zone_id}' is not part of template '{}'",
            template.id
        ))
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Document assembly
// ────────────────────────────────────────────────────────────────────────────

fn assemble(
    template: &LayoutTemplate,
    content: &[u8],
    meta: &DocumentMeta,
    options: &RenderOptions,
) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let info_id = Ref::new(5);
    let font_ref = |face: FontFace| {
        let index = FontFace::ALL.iter().position(|f| *f == face).unwrap_or(0);
        Ref::new(6 + index as i32)
    };

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);

    {
        let geometry = &template.page_geometry;
        let mut page = pdf.page(page_id);
        page.media_box(PdfRect::new(0.0, 0.0, geometry.width, geometry.height))
            .parent(pages_id)
            .contents(content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for face in FontFace::ALL {
            fonts.pair(Name(face.resource_name().as_bytes()), font_ref(face));
        }
    }

    if options.compress {
        let compressed = compress_to_vec_zlib(content, 6);
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);
    } else {
        pdf.stream(content_id, content);
    }

    for face in FontFace::ALL {
        pdf.type1_font(font_ref(face))
            .base_font(Name(face.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let subject = format!("{} — {}", meta.edition, meta.date);
    pdf.document_info(info_id)
        .title(TextStr(&meta.title))
        .author(TextStr(&options.author))
        .subject(TextStr(&subject))
        .creator(TextStr(&options.creator))
        .producer(TextStr("pdf-writer"));

    pdf.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Static zones
// ────────────────────────────────────────────────────────────────────────────

fn draw_static_zone(
    canvas: &mut Canvas,
    template: &LayoutTemplate,
    zone: &LayoutZone,
    meta: &DocumentMeta,
) {
    let palette = &template.color_palette;
    let typography = &template.typography_scale;
    let rect = zone.position;

    match zone.zone_type {
        ZoneType::Masthead => {
            let mut title_style = typography.headline;
            title_style.size = (title_style.size * MASTHEAD_SCALE).min(rect.height * 0.5);
            title_style.line_height = title_style.size * 1.2;
            let dateline = format!("{} | {}", meta.date, meta.edition);

            let title_x = centered_x(&rect, &meta.title, &title_style);
            canvas.text_line(&meta.title, title_x, rect.y, &title_style, palette.primary_text, 0.0);

            let byline = &typography.byline;
            let date_top = rect.y + title_style.line_height;
            let date_x = centered_x(&rect, &dateline, byline);
            canvas.text_line(&dateline, date_x, date_top, byline, palette.secondary_text, 0.0);

            let rule_y = rect.bottom() - HEAVY_RULE_WIDTH;
            canvas.rule(rect.x, rect.right(), rule_y, palette.accent, HEAVY_RULE_WIDTH);
            canvas.rule(rect.x, rect.right(), rect.bottom(), palette.rule, RULE_WIDTH);
        }
        ZoneType::Footer => {
            canvas.rule(rect.x, rect.right(), rect.y, palette.rule, RULE_WIDTH);
            let caption = &typography.caption;
            let left = format!("{} | {} | {}", meta.title, meta.edition, meta.date);
            let top = rect.y + (rect.height - caption.line_height) / 2.0;
            canvas.text_line(&left, rect.x, top, caption, palette.secondary_text, 0.0);

            let page_label = "1";
            let right_x = rect.right() - estimated_line_width(page_label, caption);
            canvas.text_line(page_label, right_x, top, caption, palette.secondary_text, 0.0);
        }
        _ => {
            // Weather boxes, advertisements and other fixed slots get a labelled frame.
            canvas.fill_rect(&rect, palette.tint);
            canvas.stroke_rect(&rect, palette.rule, RULE_WIDTH);
            let caption = &typography.caption;
            let x = centered_x(&rect, &zone.name, caption);
            let top = rect.y + (rect.height - caption.line_height) / 2.0;
            canvas.text_line(&zone.name, x, top, caption, palette.secondary_text, 0.0);
        }
    }
}

fn centered_x(rect: &Rect, text: &str, style: &TextStyle) -> f32 {
    let width = estimated_line_width(text, style).min(rect.width);
    rect.x + (rect.width - width) / 2.0
}

// ────────────────────────────────────────────────────────────────────────────
// Articles
// ────────────────────────────────────────────────────────────────────────────

fn draw_article(
    canvas: &mut Canvas,
    template: &LayoutTemplate,
    zone: &LayoutZone,
    placed: &PlacedArticle,
) {
    let palette = &template.color_palette;
    let article = &placed.article;
    let bounds = placed.bounds;
    let block = ArticleBlock::new(article, bounds.width, zone, template, placed.font_scale);

    let headline_color = if zone.zone_type == ZoneType::Breaking {
        palette.accent
    } else {
        palette.primary_text
    };
    let mut cursor = bounds.y;
    for line in &block.headline_lines {
        canvas.text_line(line, bounds.x, cursor, &block.headline, headline_color, 0.0);
        cursor += block.headline.line_height;
    }

    cursor = bounds.y + block.headline_height();
    let byline_color = palette.secondary_text;
    canvas.text_line(&article.byline(), bounds.x, cursor, &block.byline, byline_color, 0.0);
    cursor += block.byline.line_height;

    if block.image_height > 0.0 {
        let frame = Rect::new(bounds.x, cursor, bounds.width, block.image_height);
        canvas.fill_rect(&frame, palette.tint);
        canvas.stroke_rect(&frame, palette.rule, RULE_WIDTH);
        cursor += block.image_height;
    }

    let body = &block.body;
    let lines = &block.body_lines;
    // Tolerance keeps float error from costing the last reserved line.
    let room = ((bounds.bottom() - cursor) / body.line_height + 1e-3).floor().max(0.0) as usize;
    let justify = template.style_guide.justification == Justification::Justify;

    for (i, line) in lines.iter().take(room).enumerate() {
        let is_last = i + 1 == lines.len();
        let spacing = if justify && !is_last {
            justify_spacing(line, bounds.width, body)
        } else {
            0.0
        };
        canvas.text_line(line, bounds.x, cursor, body, palette.primary_text, spacing);
        cursor += body.line_height;
    }

    if lines.len() > room {
        debug!(
            article_id = %article.id,
            drawn = room,
            total = lines.len(),
            "Body clipped to placed box"
        );
    }
}

/// Extra word spacing that stretches `line` to `width`. Zero when the line has
/// no spaces or is already at least as wide as the column.
pub(crate) fn justify_spacing(line: &str, width: f32, style: &TextStyle) -> f32 {
    let gaps = line.chars().filter(|c| *c == ' ').count();
    if gaps == 0 {
        return 0.0;
    }
    let slack = width - estimated_line_width(line, style);
    if slack <= 0.0 {
        0.0
    } else {
        slack / gaps as f32
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
