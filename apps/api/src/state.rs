use std::sync::Arc;

use crate::articles::ArticleSource;
use crate::config::Config;
use crate::layout::registry::TemplateRegistry;
use crate::storage::EditionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built-in templates plus any loaded from `EPAPER_TEMPLATES_PATH`. Read-only after boot.
    pub registry: Arc<TemplateRegistry>,
    /// Default: `PgArticleSource`.
    pub articles: Arc<dyn ArticleSource>,
    /// Default: `S3EditionStore`.
    pub store: Arc<dyn EditionStore>,
}
