//! Axum HTTP server for the Ollama-compatible API.
//!
//! This module provides `create_router()` for tests and embedding, and
//! `serve()` which runs the router on a pre-bound `TcpListener` until the
//! cancellation token fires.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use ollamcp_core::EndpointRegistry;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ProxyConfig;
use crate::ollama_handlers::{
    ProxyState, ollama_chat, ollama_generate, ollama_ps, ollama_root, ollama_show, ollama_tags,
    ollama_version,
};
use crate::translate::now_rfc3339;

/// Build the Ollama route tree.
///
/// `GET /` also answers `HEAD /`, which some clients use as a liveness probe.
pub fn create_router(registry: Arc<EndpointRegistry>, config: ProxyConfig) -> Router {
    let state = ProxyState {
        registry,
        config: Arc::new(config),
        started_at: now_rfc3339().into(),
    };

    Router::new()
        .route("/", get(ollama_root))
        .route("/api/version", get(ollama_version))
        .route("/api/tags", get(ollama_tags))
        .route("/api/ps", get(ollama_ps))
        .route("/api/show", post(ollama_show))
        .route("/api/chat", post(ollama_chat))
        .route("/api/generate", post(ollama_generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the Ollama API with a pre-bound listener.
///
/// Returns `Ok(())` on clean shutdown, or an error if the server fails.
pub async fn serve(
    listener: TcpListener,
    registry: Arc<EndpointRegistry>,
    config: ProxyConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(
        models = ?config.models,
        default_max_tokens = config.default_max_tokens,
        "Ollama-compatible API listening on {addr}"
    );

    let app = create_router(registry, config);

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Ollama API shut down");
    Ok(())
}
