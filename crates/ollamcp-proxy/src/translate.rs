//! Translation between Ollama request/response shapes and sampling calls.
//!
//! Everything here is pure: no I/O, no registry access. Unknown roles, stop
//! reasons and content kinds are absorbed with permissive defaults rather
//! than rejected.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use ollamcp_core::{SampledContent, SamplingMessage, SamplingRequest, SamplingResult};
use tracing::warn;

use crate::ollama_models::{DoneReason, OllamaChatRequest, OllamaGenerateRequest, OllamaOptions};

/// Model name echoed back when the caller did not name one.
pub const DEFAULT_MODEL_NAME: &str = "default";

/// Outcome of translating an inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// Forward this request to the endpoint.
    Sample(SamplingRequest),
    /// Nothing to generate from; answer with a `load` reply instead.
    Preload,
}

/// Translate an Ollama chat request.
///
/// System messages are pulled out and newline-joined into the system prompt.
/// `assistant` stays `assistant`; every other role becomes `user`.
pub fn chat_to_sampling(req: &OllamaChatRequest, default_max_tokens: u32) -> Translation {
    if req.messages.iter().any(|m| m.images.is_some()) {
        warn!("Ollama images field is not supported through MCP sampling and will be ignored");
    }

    let mut system_parts = Vec::new();
    let mut messages = Vec::with_capacity(req.messages.len());
    for msg in &req.messages {
        match msg.role.as_str() {
            "system" => system_parts.push(msg.content.as_str()),
            "assistant" => messages.push(SamplingMessage::assistant(msg.content.clone())),
            _ => messages.push(SamplingMessage::user(msg.content.clone())),
        }
    }

    if messages.is_empty() {
        return Translation::Preload;
    }

    let system_prompt = (!system_parts.is_empty()).then(|| system_parts.join("\n"));
    Translation::Sample(build_request(
        messages,
        system_prompt,
        &req.model,
        req.options.as_ref(),
        default_max_tokens,
    ))
}

/// Translate an Ollama generate request: the prompt becomes a single user turn.
pub fn generate_to_sampling(req: &OllamaGenerateRequest, default_max_tokens: u32) -> Translation {
    if req.prompt.is_empty() {
        return Translation::Preload;
    }

    let system_prompt = req.system.clone().filter(|s| !s.is_empty());
    Translation::Sample(build_request(
        vec![SamplingMessage::user(req.prompt.clone())],
        system_prompt,
        &req.model,
        req.options.as_ref(),
        default_max_tokens,
    ))
}

fn build_request(
    messages: Vec<SamplingMessage>,
    system_prompt: Option<String>,
    model: &str,
    options: Option<&OllamaOptions>,
    default_max_tokens: u32,
) -> SamplingRequest {
    SamplingRequest {
        messages,
        system_prompt,
        max_tokens: max_tokens(options, default_max_tokens),
        temperature: options.and_then(|o| o.temperature),
        model_hints: (!model.is_empty()).then(|| vec![model.to_string()]),
        stop_sequences: options
            .and_then(|o| o.stop.clone())
            .filter(|stop| !stop.is_empty()),
    }
}

/// `num_predict` wins only when positive; `0`, `-1` (unlimited) and `-2`
/// (fill context) fall back to the configured default.
fn max_tokens(options: Option<&OllamaOptions>, default_max_tokens: u32) -> u32 {
    options
        .and_then(|o| o.num_predict)
        .filter(|&n| n > 0)
        .map_or(default_max_tokens, |n| u32::try_from(n).unwrap_or(u32::MAX))
}

/// Reduce sampled content to plain text. Non-text content yields `""`.
pub fn extract_text(content: Option<&SampledContent>) -> String {
    match content {
        Some(SampledContent::Text(text)) => text.clone(),
        Some(SampledContent::Image { .. } | SampledContent::Audio { .. } | SampledContent::Other)
        | None => String::new(),
    }
}

/// Map an upstream stop reason to Ollama's `done_reason`.
pub fn done_reason(stop_reason: Option<&str>) -> DoneReason {
    match stop_reason {
        Some("maxTokens") => DoneReason::Length,
        // endTurn, stopSequence, unknown and missing all read as a normal stop
        _ => DoneReason::Stop,
    }
}

/// Model name to echo in responses.
pub fn response_model(requested: &str) -> String {
    if requested.is_empty() {
        DEFAULT_MODEL_NAME.to_string()
    } else {
        requested.to_string()
    }
}

/// Current time in the RFC 3339 form Ollama uses for `created_at`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// A finished generation in Ollama terms, ready for the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub model: String,
    pub created_at: String,
    pub text: String,
    pub done_reason: DoneReason,
    /// Output size, counted in characters.
    pub eval_count: u32,
    /// Wall-clock time of the sampling call, in nanoseconds.
    pub total_duration: u64,
}

impl Completion {
    /// Build a completion from a sampling result.
    pub fn from_result(result: &SamplingResult, model: String, elapsed: Duration) -> Self {
        let text = extract_text(result.content.as_ref());
        let eval_count = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        Self {
            model,
            created_at: now_rfc3339(),
            done_reason: done_reason(result.stop_reason.as_deref()),
            eval_count,
            total_duration: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            text,
        }
    }

    /// Empty reply to a preload probe.
    pub fn preload(model: String) -> Self {
        Self {
            model,
            created_at: now_rfc3339(),
            text: String::new(),
            done_reason: DoneReason::Load,
            eval_count: 0,
            total_duration: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ollama_models::OllamaChatMessage;
    use ollamcp_core::SamplingRole;

    fn msg(role: &str, content: &str) -> OllamaChatMessage {
        OllamaChatMessage {
            role: role.to_string(),
            content: content.to_string(),
            images: None,
        }
    }

    fn chat(model: &str, messages: Vec<OllamaChatMessage>) -> OllamaChatRequest {
        OllamaChatRequest {
            model: model.to_string(),
            messages,
            stream: None,
            options: None,
        }
    }

    fn generate(prompt: &str, system: Option<&str>) -> OllamaGenerateRequest {
        OllamaGenerateRequest {
            model: String::new(),
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
            stream: None,
            options: None,
        }
    }

    fn expect_sample(translation: Translation) -> SamplingRequest {
        match translation {
            Translation::Sample(req) => req,
            Translation::Preload => panic!("expected a sampling request, got preload"),
        }
    }

    #[test]
    fn test_chat_translation() {
        let req = chat(
            "llama3",
            vec![
                msg("system", "You are helpful."),
                msg("user", "Hello"),
                msg("assistant", "Hi there!"),
                msg("user", "How are you?"),
            ],
        );

        let out = expect_sample(chat_to_sampling(&req, 4096));

        assert_eq!(out.messages.len(), 3);
        assert_eq!(out.system_prompt.as_deref(), Some("You are helpful."));
        assert_eq!(out.model_hints, Some(vec!["llama3".to_string()]));
        assert_eq!(out.max_tokens, 4096);
        assert!(out.temperature.is_none());

        let roles: Vec<SamplingRole> = out.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![SamplingRole::User, SamplingRole::Assistant, SamplingRole::User]
        );
        assert_eq!(out.messages[2].text, "How are you?");
    }

    #[test]
    fn test_chat_options_override_defaults() {
        let mut req = chat("codellama", vec![msg("user", "Write code")]);
        req.options = Some(OllamaOptions {
            num_predict: Some(2048),
            temperature: Some(0.7),
            stop: Some(vec!["```".to_string()]),
        });

        let out = expect_sample(chat_to_sampling(&req, 4096));

        assert_eq!(out.max_tokens, 2048);
        assert_eq!(out.temperature, Some(0.7));
        assert_eq!(out.stop_sequences, Some(vec!["```".to_string()]));
    }

    #[test]
    fn test_non_positive_num_predict_does_not_override() {
        for n in [0, -1, -2] {
            let mut req = chat("", vec![msg("user", "hi")]);
            req.options = Some(OllamaOptions {
                num_predict: Some(n),
                ..OllamaOptions::default()
            });
            let out = expect_sample(chat_to_sampling(&req, 512));
            assert_eq!(out.max_tokens, 512, "num_predict={n}");
        }
    }

    #[test]
    fn test_multiple_system_messages_are_joined_in_order() {
        let req = chat(
            "",
            vec![
                msg("system", "First system."),
                msg("user", "Hello"),
                msg("system", "Second system."),
            ],
        );

        let out = expect_sample(chat_to_sampling(&req, 4096));

        assert_eq!(out.system_prompt.as_deref(), Some("First system.\nSecond system."));
        assert_eq!(out.messages.len(), 1);
    }

    #[test]
    fn test_no_system_no_model() {
        let out = expect_sample(chat_to_sampling(&chat("", vec![msg("user", "Hello")]), 4096));
        assert!(out.system_prompt.is_none());
        assert!(out.model_hints.is_none());
        assert!(out.stop_sequences.is_none());
    }

    #[test]
    fn test_unknown_roles_map_to_user() {
        let req = chat("", vec![msg("unknown", "a"), msg("tool", "b"), msg("", "c")]);
        let out = expect_sample(chat_to_sampling(&req, 4096));
        assert!(out.messages.iter().all(|m| m.role == SamplingRole::User));
        assert_eq!(out.messages.len(), 3);
    }

    #[test]
    fn test_system_only_chat_is_preload() {
        let req = chat("llama3", vec![msg("system", "only system")]);
        assert_eq!(chat_to_sampling(&req, 4096), Translation::Preload);
        assert_eq!(chat_to_sampling(&chat("llama3", vec![]), 4096), Translation::Preload);
    }

    #[test]
    fn test_generate_translation() {
        let mut req = generate("Tell me a joke", Some("You are funny."));
        req.model = "llama3".to_string();

        let out = expect_sample(generate_to_sampling(&req, 4096));

        assert_eq!(out.messages, vec![SamplingMessage::user("Tell me a joke")]);
        assert_eq!(out.system_prompt.as_deref(), Some("You are funny."));
        assert_eq!(out.model_hints, Some(vec!["llama3".to_string()]));
    }

    #[test]
    fn test_generate_options() {
        let mut req = generate("Hello", None);
        req.options = Some(OllamaOptions {
            num_predict: Some(512),
            temperature: Some(0.5),
            stop: None,
        });

        let out = expect_sample(generate_to_sampling(&req, 4096));

        assert_eq!(out.max_tokens, 512);
        assert_eq!(out.temperature, Some(0.5));
    }

    #[test]
    fn test_generate_empty_system_is_omitted() {
        let out = expect_sample(generate_to_sampling(&generate("Hello", Some("")), 4096));
        assert!(out.system_prompt.is_none());
    }

    #[test]
    fn test_generate_empty_prompt_is_preload() {
        assert_eq!(
            generate_to_sampling(&generate("", Some("sys")), 4096),
            Translation::Preload
        );
    }

    #[test]
    fn test_done_reason_mapping() {
        assert_eq!(done_reason(Some("endTurn")), DoneReason::Stop);
        assert_eq!(done_reason(Some("maxTokens")), DoneReason::Length);
        assert_eq!(done_reason(Some("stopSequence")), DoneReason::Stop);
        assert_eq!(done_reason(Some("unknown")), DoneReason::Stop);
        assert_eq!(done_reason(Some("")), DoneReason::Stop);
        assert_eq!(done_reason(None), DoneReason::Stop);
    }

    #[test]
    fn test_extract_text() {
        assert_eq!(extract_text(Some(&SampledContent::Text("hello".into()))), "hello");
        assert_eq!(extract_text(None), "");
        assert_eq!(
            extract_text(Some(&SampledContent::Image {
                mime_type: "image/png".into()
            })),
            ""
        );
        assert_eq!(extract_text(Some(&SampledContent::Other)), "");
    }

    #[test]
    fn test_completion_counts_characters() {
        let result = SamplingResult::text("héllo", "maxTokens");
        let completion =
            Completion::from_result(&result, "llama3".into(), Duration::from_millis(2));

        assert_eq!(completion.text, "héllo");
        assert_eq!(completion.eval_count, 5);
        assert_eq!(completion.done_reason, DoneReason::Length);
        assert_eq!(completion.total_duration, 2_000_000);
    }

    #[test]
    fn test_preload_completion() {
        let completion = Completion::preload("llama3".into());
        assert!(completion.text.is_empty());
        assert_eq!(completion.done_reason, DoneReason::Load);
    }

    #[test]
    fn test_response_model_defaults() {
        assert_eq!(response_model(""), "default");
        assert_eq!(response_model("llama3"), "llama3");
    }
}
