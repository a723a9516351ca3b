//! HTTP surface: the index page plus the three JSON endpoints.
//!
//! ```text
//!  Browser                   uiforge                          Provider
//! ┌────────────┐ POST JSON ┌────────────────────────────┐    ┌──────────┐
//! │ index page ├──────────►│ enhance → model → sanitize ├───►│   LLM    │
//! │ + iframe   │◄──────────┤ session store, artifacts   │◄───┤          │
//! └────────────┘           └────────────────────────────┘    └──────────┘
//! ```
//!
//! Every endpoint answers 200; failures are `{"success": false, "error": ...}`.

pub mod handlers;
pub mod page;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::artifacts::ArtifactWriter;
use crate::config::{Config, FailurePolicy};
use crate::llm::factory::ClientFactory;
use crate::pipeline::generator::Generator;
use crate::session::SessionStore;

/// Refine requests carry whole documents; axum's 2 MiB default is too tight.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub type SharedState = Arc<AppState>;

/// Shared state passed to all request handlers
pub struct AppState {
    pub generator: Generator,
    pub sessions: SessionStore,
    pub artifacts: ArtifactWriter,
    pub failure_policy: FailurePolicy,
    pub enhance_by_default: bool,
}

impl AppState {
    pub fn new(config: &Config, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            generator: Generator::new(factory),
            sessions: SessionStore::new(&config.sessions),
            artifacts: ArtifactWriter::new(config.server.output_dir.clone()),
            failure_policy: config.generation.failure_policy,
            enhance_by_default: config.generation.enhance_by_default,
        }
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/healthz", get(health))
        .route("/test-api-key", post(handlers::test_api_key))
        .route("/generate", post(handlers::generate))
        .route("/refine", post(handlers::refine))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind, serve until ctrl-c / SIGTERM, then drop all sessions.
pub async fn serve(config: Config, factory: Arc<dyn ClientFactory>) -> Result<()> {
    let state: SharedState = Arc::new(AppState::new(&config, factory));
    state.artifacts.ensure_dir().await?;

    let router = build_router(Arc::clone(&state));
    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;

    info!(
        addr = %listener.local_addr()?,
        provider = %config.llm.provider,
        model = %config.llm.model,
        output_dir = %config.server.output_dir.display(),
        failure_policy = ?config.generation.failure_policy,
        "Binding HTTP listener"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    state.sessions.clear();
    info!("HTTP server exited");
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "uiforge" }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
