mod articles;
mod config;
mod db;
mod epaper;
mod errors;
mod layout;
mod models;
mod render;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::articles::PgArticleSource;
use crate::config::Config;
use crate::db::create_pool;
use crate::layout::TemplateRegistry;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3EditionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting e-paper API v{}", env!("CARGO_PKG_VERSION"));

    // Template registry: built-ins, then optional overrides from disk
    let mut registry = TemplateRegistry::with_builtin();
    if let Some(path) = &config.templates_path {
        let loaded = registry
            .load_json_file(path)
            .with_context(|| format!("Failed to load templates from {}", path.display()))?;
        info!("Loaded {loaded} template(s) from {}", path.display());
    }
    registry
        .get(&config.default_template)
        .context("EPAPER_DEFAULT_TEMPLATE does not name a registered template")?;
    info!(
        "Template registry ready: {} template(s), default '{}', pool policy {:?}",
        registry.list().len(),
        config.default_template,
        config.pool_policy
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Build app state
    let state = AppState {
        config: config.clone(),
        registry: Arc::new(registry),
        articles: Arc::new(PgArticleSource::new(db)),
        store: Arc::new(S3EditionStore::new(s3, config.s3_bucket.clone())),
    };

    // Build router
    // TODO: restrict CORS origins once the newsroom front end has a fixed host
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "epaper-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO needs path-style addressing.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
