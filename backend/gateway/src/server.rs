//! HTTP server wiring: shared state, router, and the serve loop.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tagforge_config::ServerConfig;
use tagforge_understanding::Analyzer;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use crate::analyze::analyze_image;
use crate::health::health;

/// Allowance for multipart boundaries and part headers on top of the file.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across routes. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub max_upload_bytes: usize,
    /// Fired on shutdown; aborts in-flight provider calls.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(analyzer: Analyzer, max_upload_bytes: usize) -> Self {
        Self {
            analyzer,
            max_upload_bytes,
            shutdown: CancellationToken::new(),
        }
    }
}

/// Build the router with all API routes.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);
    Router::new()
        .route("/api/analyze", post(analyze_image))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `state.shutdown` is cancelled, then drain connections.
#[instrument(skip_all)]
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let shutdown = state.shutdown.clone();
    let addr = config.addr();
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "TagForge HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("HTTP API stopped");
    Ok(())
}
