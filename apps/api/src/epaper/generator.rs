//! E-paper Generator — one request in, one PDF page out.
//!
//! `generate_epaper` is synchronous: prioritize → select → place → render.
//! Handlers call `generate_epaper_blocking`, which moves the owned inputs into
//! `tokio::task::spawn_blocking` so layout never stalls the executor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::layout::planner::{plan_page, LayoutPlan};
use crate::layout::registry::TemplateRegistry;
use crate::layout::zone_selector::PoolPolicy;
use crate::models::Article;
use crate::render::{render_pdf, DocumentMeta, RenderOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub template_id: String,
    pub articles: Vec<Article>,
    pub meta: DocumentMeta,
    #[serde(default)]
    pub policy: PoolPolicy,
}

/// Rendered page plus the plan it was drawn from.
#[derive(Debug, Clone)]
pub struct EpaperDocument {
    pub bytes: Vec<u8>,
    pub plan: LayoutPlan,
}

pub fn generate_epaper(
    registry: &TemplateRegistry,
    request: GenerationRequest,
    options: &RenderOptions,
) -> Result<EpaperDocument, AppError> {
    let GenerationRequest {
        template_id,
        articles,
        meta,
        policy,
    } = request;

    let template = registry.get(&template_id)?;
    let plan = plan_page(registry, &template_id, articles, policy)?;
    let bytes = render_pdf(template, &plan, &meta, options)?;

    info!(
        template_id = %template_id,
        edition = %meta.edition,
        placed = plan.placed_count(),
        unplaced = plan.unplaced.len(),
        size = bytes.len(),
        "Generated e-paper"
    );

    Ok(EpaperDocument { bytes, plan })
}

/// `generate_epaper` on the blocking pool.
pub async fn generate_epaper_blocking(
    registry: Arc<TemplateRegistry>,
    request: GenerationRequest,
    options: RenderOptions,
) -> Result<EpaperDocument, AppError> {
    tokio::task::spawn_blocking(move || generate_epaper(&registry, request, &options))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))?
}

/// `plan_page` on the blocking pool, for callers that only need the layout.
pub async fn plan_page_blocking(
    registry: Arc<TemplateRegistry>,
    template_id: String,
    articles: Vec<Article>,
    policy: PoolPolicy,
) -> Result<LayoutPlan, AppError> {
    tokio::task::spawn_blocking(move || plan_page(&registry, &template_id, articles, policy))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::registry::{BANGLADESH_PREMIUM, COMPACT_MODERN};
    use crate::models::article::fixtures::article;

    fn request(template_id: &str, articles: Vec<Article>) -> GenerationRequest {
        GenerationRequest {
            template_id: template_id.to_string(),
            articles,
            meta: DocumentMeta {
                title: "Bengali News Time".to_string(),
                date: "2024-03-01".to_string(),
                edition: "Dhaka".to_string(),
            },
            policy: PoolPolicy::Consume,
        }
    }

    #[test]
    fn test_generate_returns_pdf_and_plan() {
        let registry = TemplateRegistry::with_builtin();
        let articles = vec![
            article("breaking", 70, true, 10),
            article("lead", 92, false, 5),
            article("brief", 40, false, 0),
        ];
        let doc = generate_epaper(
            &registry,
            request(BANGLADESH_PREMIUM, articles),
            &RenderOptions::default(),
        )
        .unwrap();
        assert!(doc.bytes.starts_with(b"%PDF-"));
        assert_eq!(doc.plan.template_id, BANGLADESH_PREMIUM);
        assert_eq!(doc.plan.placed_count() + doc.plan.unplaced.len(), 3);
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let registry = TemplateRegistry::with_builtin();
        let result = generate_epaper(&registry, request("nope", vec![]), &RenderOptions::default());
        assert!(matches!(result, Err(AppError::TemplateNotFound(id)) if id == "nope"));
    }

    #[tokio::test]
    async fn test_blocking_wrapper_matches_sync_result() {
        let registry = Arc::new(TemplateRegistry::with_builtin());
        let articles = vec![article("a", 85, false, 0), article("b", 60, false, 1)];
        let sync = generate_epaper(
            &registry,
            request(COMPACT_MODERN, articles.clone()),
            &RenderOptions::default(),
        )
        .unwrap();
        let blocking = generate_epaper_blocking(
            registry,
            request(COMPACT_MODERN, articles),
            RenderOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(sync.bytes, blocking.bytes);
        assert_eq!(sync.plan, blocking.plan);
    }
}
