pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::epaper::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Templates
        .route("/api/v1/epaper/templates", get(handlers::handle_list_templates))
        .route(
            "/api/v1/epaper/templates/:id",
            get(handlers::handle_get_template),
        )
        // Layout and rendering
        .route("/api/v1/epaper/layout", post(handlers::handle_layout))
        .route("/api/v1/epaper/render", post(handlers::handle_render))
        .route(
            "/api/v1/epaper/editions",
            post(handlers::handle_create_edition),
        )
        .fallback(not_found)
        .with_state(state)
}
