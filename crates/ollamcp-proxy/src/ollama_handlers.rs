//! Ollama-native API route handlers.
//!
//! These handlers accept Ollama-format requests, translate them into a
//! sampling request, run it on the currently attached MCP host, and
//! translate the result back into Ollama format. To Ollama clients the
//! bridge looks like an Ollama server on port 11434.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use ollamcp_core::EndpointRegistry;

use crate::config::ProxyConfig;
use crate::error::GatewayError;
use crate::ollama_models::*;
use crate::ollama_stream::{self, ReplyKind};
use crate::translate::{self, Completion, Translation};

// ── Shared State ───────────────────────────────────────────────────────

/// Shared proxy state, cloned into every handler via Axum `State`.
#[derive(Clone)]
pub(crate) struct ProxyState {
    pub registry: Arc<EndpointRegistry>,
    pub config: Arc<ProxyConfig>,
    /// Reported as `modified_at` for every advertised model.
    pub started_at: Arc<str>,
}

// ── GET / ──────────────────────────────────────────────────────────────

/// Ollama root probe: plain-text `"Ollama is running"`.
pub(crate) async fn ollama_root() -> impl IntoResponse {
    OLLAMA_ROOT_RESPONSE
}

// ── GET /api/version ───────────────────────────────────────────────────

pub(crate) async fn ollama_version(State(state): State<ProxyState>) -> impl IntoResponse {
    Json(OllamaVersionResponse {
        version: state.config.api_version.clone(),
    })
}

// ── GET /api/tags ──────────────────────────────────────────────────────

pub(crate) async fn ollama_tags(State(state): State<ProxyState>) -> impl IntoResponse {
    debug!("GET /api/tags");
    Json(OllamaTagsResponse::from_names(
        &state.config.models,
        &state.started_at,
    ))
}

// ── POST /api/show ─────────────────────────────────────────────────────

pub(crate) async fn ollama_show(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let req: OllamaShowRequest = serde_json::from_slice(&body)?;
    let name = req.effective_model();
    debug!(model = %name, "POST /api/show");

    if !state.config.advertises(name) {
        return Err(GatewayError::ModelNotFound(name.to_string()));
    }
    Ok(Json(OllamaShowResponse::advertised(name, &state.started_at)).into_response())
}

// ── GET /api/ps ────────────────────────────────────────────────────────

/// Advertised models count as "running" while a host is attached.
pub(crate) async fn ollama_ps(State(state): State<ProxyState>) -> impl IntoResponse {
    debug!("GET /api/ps");
    let models = if state.registry.is_empty().await {
        vec![]
    } else {
        state
            .config
            .models
            .iter()
            .map(|name| OllamaPsEntry::attached(name))
            .collect()
    };
    Json(OllamaPsResponse { models })
}

// ── POST /api/chat ─────────────────────────────────────────────────────

pub(crate) async fn ollama_chat(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let req: OllamaChatRequest = serde_json::from_slice(&body).inspect_err(|e| {
        error!("Invalid /api/chat request: {e}");
    })?;

    let streaming = req.stream.unwrap_or(true);
    info!(
        model = %req.model,
        streaming,
        messages = req.messages.len(),
        "POST /api/chat"
    );

    let translation = translate::chat_to_sampling(&req, state.config.default_max_tokens);
    dispatch(&state, translation, &req.model, ReplyKind::Chat, streaming).await
}

// ── POST /api/generate ─────────────────────────────────────────────────

pub(crate) async fn ollama_generate(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let req: OllamaGenerateRequest = serde_json::from_slice(&body).inspect_err(|e| {
        error!("Invalid /api/generate request: {e}");
    })?;

    let streaming = req.stream.unwrap_or(true);
    info!(model = %req.model, streaming, "POST /api/generate");

    let translation = translate::generate_to_sampling(&req, state.config.default_max_tokens);
    dispatch(&state, translation, &req.model, ReplyKind::Generate, streaming).await
}

// ── Shared Helpers ─────────────────────────────────────────────────────

/// Run a translated request on the current endpoint and emit the reply.
///
/// The cancellation token is cancelled when this future is dropped, which
/// hyper does as soon as the client disconnects.
async fn dispatch(
    state: &ProxyState,
    translation: Translation,
    requested_model: &str,
    kind: ReplyKind,
    streaming: bool,
) -> Result<Response, GatewayError> {
    let endpoint = state.registry.current().await.ok_or_else(|| {
        error!("No MCP host attached; rejecting request");
        GatewayError::NoEndpoint
    })?;

    let model = translate::response_model(requested_model);

    let request = match translation {
        Translation::Sample(request) => request,
        Translation::Preload => {
            debug!(model = %model, "Preload request; not forwarding");
            let completion = Completion::preload(model);
            return Ok(ollama_stream::emit_preload(kind, &completion, streaming));
        }
    };

    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    debug!(
        endpoint_id = %endpoint.id(),
        messages = request.messages.len(),
        max_tokens = request.max_tokens,
        "Dispatching sampling request"
    );

    let start = Instant::now();
    let result = endpoint.sample(request, cancel).await.map_err(|e| {
        error!(endpoint_id = %endpoint.id(), "Sampling failed: {e}");
        GatewayError::Sampling(e)
    })?;

    let completion = Completion::from_result(&result, model, start.elapsed());
    info!(
        endpoint_id = %endpoint.id(),
        upstream_model = result.model.as_deref().unwrap_or(""),
        done_reason = ?completion.done_reason,
        eval_count = completion.eval_count,
        "Sampling completed"
    );

    Ok(ollama_stream::emit(kind, &completion, streaming))
}
