//! Text metrics shared by placement and rendering.
//!
//! Widths are a uniform approximation: every character is assumed to be
//! `AVERAGE_CHAR_WIDTH_EM × font size` wide. Bengali glyph clusters do not
//! follow Latin averages, so estimates can drift from the shaped result; the
//! renderer clips to the estimated box rather than re-measuring.
//!
//! Line counts come from `estimate_lines`, which placement uses to size a
//! block and the renderer uses (via `placement::ArticleBlock`) to lay it out,
//! so every wrapped line the renderer draws has been reserved.

use serde::{Deserialize, Serialize};

use crate::layout::template::TextStyle;

/// Average glyph advance relative to the font size.
pub const AVERAGE_CHAR_WIDTH_EM: f32 = 0.6;

// ────────────────────────────────────────────────────────────────────────────
// Font faces
// ────────────────────────────────────────────────────────────────────────────

/// Font faces available to templates. Each maps onto a PDF base-14 Type1 font,
/// so nothing needs embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFace {
    /// Headline face for the broadsheet templates.
    TimesBold,
    TimesRoman,
    TimesItalic,
    Helvetica,
    HelveticaBold,
}

impl FontFace {
    pub const ALL: [FontFace; 5] = [
        FontFace::TimesBold,
        FontFace::TimesRoman,
        FontFace::TimesItalic,
        FontFace::Helvetica,
        FontFace::HelveticaBold,
    ];

    /// PostScript name of the standard font.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::TimesBold => "Times-Bold",
            FontFace::TimesRoman => "Times-Roman",
            FontFace::TimesItalic => "Times-Italic",
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::TimesBold => "F1",
            FontFace::TimesRoman => "F2",
            FontFace::TimesItalic => "F3",
            FontFace::Helvetica => "F4",
            FontFace::HelveticaBold => "F5",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Estimation
// ────────────────────────────────────────────────────────────────────────────

pub fn char_width(style: &TextStyle) -> f32 {
    AVERAGE_CHAR_WIDTH_EM * style.size
}

/// Number of characters that fit on one line of `width` points. Never 0.
pub fn chars_per_line(width: f32, style: &TextStyle) -> usize {
    let per_char = char_width(style);
    if per_char <= 0.0 || width <= 0.0 {
        return 1;
    }
    // Nudge absorbs f32 error when width is an exact multiple of the char width.
    ((width / per_char + 1e-4).floor() as usize).max(1)
}

/// Estimated number of lines for `text` at `width`.
///
/// The character-count figure (`ceil(chars / chars_per_line)`, Unicode scalar
/// values) is a floor; when words do not pack, the greedy wrap needs more lines
/// and that count is used instead.
pub fn estimate_lines(text: &str, width: f32, style: &TextStyle) -> usize {
    let per_line = chars_per_line(width, style);
    let by_chars = text.chars().count().div_ceil(per_line);
    by_chars.max(wrap_lines(text, per_line).len())
}

/// Estimated height of a text block: `lines × line_height`.
pub fn estimate_text_block_height(text: &str, width: f32, style: &TextStyle) -> f32 {
    estimate_lines(text, width, style) as f32 * style.line_height
}

/// Estimated rendered width of a single line, including tracking.
pub fn estimated_line_width(line: &str, style: &TextStyle) -> f32 {
    let chars = line.chars().count() as f32;
    chars * char_width(style) + (chars - 1.0).max(0.0) * style.tracking
}

/// Greedy word wrap to a character budget per line.
///
/// Words longer than the budget are split hard. Whitespace runs collapse to a
/// single space.
pub fn wrap_lines(text: &str, chars_per_line: usize) -> Vec<String> {
    let budget = chars_per_line.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut rest: Vec<char> = word.chars().collect();

        // Hard-split words that cannot fit on any line.
        while rest.len() > budget {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let tail = rest.split_off(budget);
            lines.push(rest.into_iter().collect());
            rest = tail;
        }

        let word_len = rest.len();
        if word_len == 0 {
            continue;
        }
        let space = if current_len == 0 { 0 } else { 1 };
        if current_len + space + word_len > budget {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(rest);
        current_len += word_len;
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}
