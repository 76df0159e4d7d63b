// Page layout engine: template model, text metrics, prioritization, zone
// selection, column placement and fill analysis.
// Everything here is synchronous and CPU-bound; async callers go through
// tokio::task::spawn_blocking (see epaper::generator).

pub mod font_metrics;
pub mod page_fill;
pub mod placement;
pub mod planner;
pub mod prioritizer;
pub mod registry;
pub mod template;
pub mod zone_selector;

// Re-export the public API consumed by the generator and handlers.
pub use page_fill::{analyze_page_fill, PageFillAnalysis};
pub use planner::{plan_page, LayoutPlan};
pub use registry::TemplateRegistry;
pub use template::LayoutTemplate;
pub use zone_selector::PoolPolicy;
