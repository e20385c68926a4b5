//! HTTP server implementation using Axum.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::post;
use faqbot_service::FaqService;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::routes;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FaqService>,
}

impl AppState {
    pub fn new(service: Arc<FaqService>) -> Self {
        Self { service }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let router = Router::new()
        .route("/chat", post(routes::chat))
        .route(
            "/upload",
            post(routes::upload).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .layer(cors_layer(&config.allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'")))
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Ingest the seed file, logging instead of failing so the server still
/// starts (untrained) when the seed is missing or broken.
pub async fn load_seed_or_warn(service: &FaqService, path: &Path) {
    match service.load_seed(path).await {
        Ok(report) => info!("Seeded {} FAQs from {}", report.added, path.display()),
        Err(e) => warn!("Error loading initial FAQs from {}: {e}", path.display()),
    }
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, service: Arc<FaqService>) -> Result<()> {
    let router = build_router(AppState::new(service), config)?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
