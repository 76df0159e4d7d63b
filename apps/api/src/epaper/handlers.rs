use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::epaper::generator::{generate_epaper_blocking, plan_page_blocking, GenerationRequest};
use crate::errors::AppError;
use crate::layout::page_fill::{analyze_page_fill, PageFillAnalysis};
use crate::layout::planner::LayoutPlan;
use crate::layout::template::{LayoutTemplate, TemplateCategory};
use crate::layout::zone_selector::PoolPolicy;
use crate::models::Article;
use crate::render::DocumentMeta;
use crate::state::AppState;
use crate::storage::edition_key;

// ────────────────────────────────────────────────────────────────────────────
// Request / response bodies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    pub page_width: f32,
    pub page_height: f32,
    pub columns: u32,
    pub zone_count: usize,
}

impl From<&LayoutTemplate> for TemplateSummary {
    fn from(t: &LayoutTemplate) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            category: t.category,
            page_width: t.page_geometry.width,
            page_height: t.page_geometry.height,
            columns: t.grid.columns,
            zone_count: t.zones.len(),
        }
    }
}

#[derive(Deserialize)]
pub struct TemplateQuery {
    pub category: Option<TemplateCategory>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub template_id: Option<String>,
    pub articles: Vec<Article>,
    pub policy: Option<PoolPolicy>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    pub plan: LayoutPlan,
    pub fill: PageFillAnalysis,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub template_id: Option<String>,
    pub articles: Vec<Article>,
    pub meta: DocumentMeta,
    pub policy: Option<PoolPolicy>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionRequest {
    pub date: NaiveDate,
    pub edition: String,
    pub template_id: Option<String>,
    /// Masthead title; defaults to the configured publication name.
    pub title: Option<String>,
    pub policy: Option<PoolPolicy>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionResponse {
    pub key: String,
    pub template_id: String,
    pub fetched: usize,
    pub placed: usize,
    pub unplaced: usize,
    pub size_bytes: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/epaper/templates?category=broadsheet|tabloid|compact
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Query(params): Query<TemplateQuery>,
) -> Json<Vec<TemplateSummary>> {
    let templates = match params.category {
        Some(category) => state.registry.by_category(category),
        None => state.registry.list(),
    };
    Json(templates.into_iter().map(TemplateSummary::from).collect())
}

/// GET /api/v1/epaper/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LayoutTemplate>, AppError> {
    Ok(Json(state.registry.get(&id)?.clone()))
}

/// POST /api/v1/epaper/layout
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(req): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    ensure_unique_ids(&req.articles)?;
    let template_id = req
        .template_id
        .unwrap_or_else(|| state.config.default_template.clone());
    let policy = req.policy.unwrap_or(state.config.pool_policy);

    let plan = plan_page_blocking(state.registry.clone(), template_id, req.articles, policy).await?;
    let template = state.registry.get(&plan.template_id)?;
    let fill = analyze_page_fill(&template.zones, &plan.placements);

    Ok(Json(LayoutResponse { plan, fill }))
}

/// POST /api/v1/epaper/render
pub async fn handle_render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_unique_ids(&req.articles)?;
    let request = GenerationRequest {
        template_id: req
            .template_id
            .unwrap_or_else(|| state.config.default_template.clone()),
        articles: req.articles,
        meta: req.meta,
        policy: req.policy.unwrap_or(state.config.pool_policy),
    };
    let filename = format!("{}-{}.pdf", request.template_id, request.meta.date);

    let doc = generate_epaper_blocking(
        state.registry.clone(),
        request,
        state.config.render_options(),
    )
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        Bytes::from(doc.bytes),
    ))
}

/// POST /api/v1/epaper/editions
/// Fetches the day's articles, renders the page and stores the PDF.
pub async fn handle_create_edition(
    State(state): State<AppState>,
    Json(req): Json<EditionRequest>,
) -> Result<Json<EditionResponse>, AppError> {
    if req.edition.trim().is_empty() {
        return Err(AppError::Validation("edition must not be empty".to_string()));
    }
    let template_id = req
        .template_id
        .unwrap_or_else(|| state.config.default_template.clone());
    // Fail before touching the database when the template is unknown.
    state.registry.get(&template_id)?;

    let articles = state
        .articles
        .fetch_for_edition(req.date, state.config.article_limit)
        .await?;
    let fetched = articles.len();

    let request = GenerationRequest {
        template_id: template_id.clone(),
        articles,
        meta: DocumentMeta {
            title: req.title.unwrap_or_else(|| state.config.author.clone()),
            date: req.date.to_string(),
            edition: req.edition.clone(),
        },
        policy: req.policy.unwrap_or(state.config.pool_policy),
    };
    let doc = generate_epaper_blocking(
        state.registry.clone(),
        request,
        state.config.render_options(),
    )
    .await?;

    let key = edition_key(req.date, &template_id, &req.edition);
    let size_bytes = doc.bytes.len();
    state.store.put_pdf(&key, Bytes::from(doc.bytes)).await?;

    info!(%key, fetched, placed = doc.plan.placed_count(), "Published e-paper edition");

    Ok(Json(EditionResponse {
        key,
        template_id,
        fetched,
        placed: doc.plan.placed_count(),
        unplaced: doc.plan.unplaced.len(),
        size_bytes,
    }))
}

/// Article ids key the pool bookkeeping, so duplicates are rejected up front.
fn ensure_unique_ids(articles: &[Article]) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(articles.len());
    for article in articles {
        if !seen.insert(article.id) {
            return Err(AppError::Validation(format!(
                "duplicate article id {}",
                article.id
            )));
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::articles::StaticArticleSource;
    use crate::config::Config;
    use crate::layout::registry::{TemplateRegistry, MODERN_TABLOID};
    use crate::models::article::fixtures::article;
    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::storage::MemoryEditionStore;

    fn app_with(articles: Vec<crate::models::Article>, store: Arc<MemoryEditionStore>) -> Router {
        build_router(AppState {
            config: Config::for_tests(),
            registry: Arc::new(TemplateRegistry::with_builtin()),
            articles: Arc::new(StaticArticleSource { articles }),
            store,
        })
    }

    fn app() -> Router {
        app_with(vec![], Arc::new(MemoryEditionStore::default()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_templates() {
        let response = app().oneshot(get("/api/v1/epaper/templates")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"bangladesh-premium"));
    }

    #[tokio::test]
    async fn test_list_templates_filters_by_category() {
        let response = app()
            .oneshot(get("/api/v1/epaper/templates?category=tabloid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let templates = body.as_array().unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0]["id"], MODERN_TABLOID);
        assert_eq!(templates[0]["category"], "tabloid");
    }

    #[tokio::test]
    async fn test_list_templates_rejects_unknown_category() {
        let response = app()
            .oneshot(get("/api/v1/epaper/templates?category=gazette"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_unknown_template_is_404() {
        let response = app()
            .oneshot(get("/api/v1/epaper/templates/broadsheet-xl"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "TEMPLATE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_template_returns_zones() {
        let response = app()
            .oneshot(get("/api/v1/epaper/templates/modern-tabloid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], MODERN_TABLOID);
        assert!(body["zones"].as_array().unwrap().len() >= 6);
    }

    #[tokio::test]
    async fn test_layout_returns_plan_and_fill() {
        let articles = vec![article("breaking", 70, true, 5), article("lead", 95, false, 0)];
        let response = app()
            .oneshot(post_json(
                "/api/v1/epaper/layout",
                json!({ "articles": articles }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["plan"]["templateId"], "bangladesh-premium");
        assert_eq!(body["fill"]["totalPlaced"], 2);
        assert_eq!(body["plan"]["staticZones"], json!(["masthead", "footer"]));
    }

    #[tokio::test]
    async fn test_layout_rejects_duplicate_ids() {
        let a = article("a", 50, false, 0);
        let response = app()
            .oneshot(post_json(
                "/api/v1/epaper/layout",
                json!({ "articles": [a.clone(), a] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_render_returns_pdf() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/epaper/render",
                json!({
                    "templateId": "compact-modern",
                    "articles": [article("lead", 90, false, 0)],
                    "meta": { "title": "Bengali News Time", "date": "2024-03-01", "edition": "Dhaka" }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/pdf"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_render_unknown_template_is_404() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/epaper/render",
                json!({
                    "templateId": "missing",
                    "articles": [],
                    "meta": { "title": "t", "date": "d", "edition": "e" }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_edition_stores_pdf() {
        let store = Arc::new(MemoryEditionStore::default());
        let articles = vec![
            article("breaking", 70, true, 10),
            article("lead", 92, false, 5),
            article("brief", 40, false, 0),
        ];
        let response = app_with(articles, store.clone())
            .oneshot(post_json(
                "/api/v1/epaper/editions",
                json!({ "date": "2024-03-01", "edition": "Dhaka Edition" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let key = "epapers/2024-03-01/bangladesh-premium-dhaka-edition.pdf";
        assert_eq!(body["key"], key);
        assert_eq!(body["fetched"], 3);

        let objects = store.objects.lock().unwrap();
        assert!(objects[key].starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_create_edition_requires_label() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/epaper/editions",
                json!({ "date": "2024-03-01", "edition": "  " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["service"], "epaper-api");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_body() {
        let response = app().oneshot(get("/api/v1/nothing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
