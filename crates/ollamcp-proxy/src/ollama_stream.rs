//! Ollama reply emission.
//!
//! MCP sampling returns the whole result in one step, so "streaming" here is
//! a fixed two-frame NDJSON sequence: one frame carrying all of the text with
//! `done: false`, then an empty terminal frame with `done_reason` and the
//! accounting fields. Each frame is its own body chunk, so hyper writes it out
//! without waiting for the next.

use axum::{
    Json,
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::error;

use crate::ollama_models::{
    DoneReason, OllamaChatMessage, OllamaChatResponse, OllamaGenerateResponse,
};
use crate::translate::Completion;

/// Which Ollama endpoint the reply is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// `/api/chat`: text goes in `message.content`.
    Chat,
    /// `/api/generate`: text goes in `response`.
    Generate,
}

/// Terminal-frame fields.
///
/// Durations are synthetic: the whole sampling round trip counts as eval
/// time and nothing is ever loaded locally.
#[derive(Clone, Copy)]
struct FinalStats {
    done_reason: DoneReason,
    total_duration: u64,
    load_duration: u64,
    eval_count: u32,
    eval_duration: u64,
}

impl FinalStats {
    const fn of(completion: &Completion) -> Self {
        Self {
            done_reason: completion.done_reason,
            total_duration: completion.total_duration,
            load_duration: 0,
            eval_count: completion.eval_count,
            eval_duration: completion.total_duration,
        }
    }
}

/// Emit a completion as either one JSON object or two NDJSON frames.
pub fn emit(kind: ReplyKind, completion: &Completion, streaming: bool) -> Response {
    if streaming {
        ndjson_response(vec![
            encode_line(&frame(kind, completion, completion.text.clone(), None)),
            encode_line(&frame(kind, completion, String::new(), Some(FinalStats::of(completion)))),
        ])
    } else {
        let reply = frame(kind, completion, completion.text.clone(), Some(FinalStats::of(completion)));
        Json(reply).into_response()
    }
}

/// Emit the single terminal reply to a preload probe.
pub fn emit_preload(kind: ReplyKind, completion: &Completion, streaming: bool) -> Response {
    let reply = frame(kind, completion, String::new(), Some(FinalStats::of(completion)));
    if streaming {
        ndjson_response(vec![encode_line(&reply)])
    } else {
        Json(reply).into_response()
    }
}

/// One reply object; `stats` present means this is the terminal frame.
fn frame(
    kind: ReplyKind,
    completion: &Completion,
    text: String,
    stats: Option<FinalStats>,
) -> serde_json::Value {
    let done = stats.is_some();
    let reply = match kind {
        ReplyKind::Chat => serde_json::to_value(OllamaChatResponse {
            model: completion.model.clone(),
            created_at: completion.created_at.clone(),
            message: OllamaChatMessage::assistant(text),
            done,
            done_reason: stats.map(|s| s.done_reason),
            total_duration: stats.map(|s| s.total_duration),
            load_duration: stats.map(|s| s.load_duration),
            eval_count: stats.map(|s| s.eval_count),
            eval_duration: stats.map(|s| s.eval_duration),
        }),
        ReplyKind::Generate => serde_json::to_value(OllamaGenerateResponse {
            model: completion.model.clone(),
            created_at: completion.created_at.clone(),
            response: text,
            done,
            done_reason: stats.map(|s| s.done_reason),
            total_duration: stats.map(|s| s.total_duration),
            load_duration: stats.map(|s| s.load_duration),
            eval_count: stats.map(|s| s.eval_count),
            eval_duration: stats.map(|s| s.eval_duration),
        }),
    };
    reply_value(reply)
}

/// Encoding failures become an Ollama-style error frame instead of `null`.
fn reply_value(reply: Result<serde_json::Value, serde_json::Error>) -> serde_json::Value {
    reply.unwrap_or_else(|e| {
        error!("Failed to encode Ollama reply: {e}");
        serde_json::json!({ "error": format!("failed to encode reply: {e}") })
    })
}

fn encode_line(value: &serde_json::Value) -> Bytes {
    let mut out = value.to_string();
    out.push('\n');
    Bytes::from(out)
}

fn ndjson_response(frames: Vec<Bytes>) -> Response {
    let chunks = futures_util::stream::iter(frames.into_iter().map(Ok::<_, std::io::Error>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(chunks))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
