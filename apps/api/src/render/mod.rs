// Render Pipeline: draws a planned page onto a single-page PDF.
// Text shaping is not performed; base-14 fonts with WinAnsi encoding are used.

pub mod encoding;
pub mod pdf;

use serde::{Deserialize, Serialize};

pub use pdf::render_pdf;

pub const DEFAULT_AUTHOR: &str = "Bengali News Time";

/// Edition details printed in the masthead and footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub title: String,
    pub date: String,
    pub edition: String,
}

/// Document-level settings that do not come from the template.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub author: String,
    pub creator: String,
    /// Deflate the page content stream.
    pub compress: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            creator: format!("epaper {}", env!("CARGO_PKG_VERSION")),
            compress: true,
        }
    }
}
