//! Sampling request and result types.
//!
//! These mirror the shape of an MCP `sampling/createMessage` exchange without
//! depending on any MCP crate, so the translator and the registry can be
//! tested without a live session.

/// Role of a message sent to a sampling endpoint.
///
/// There is no `System` variant: system content travels in
/// [`SamplingRequest::system_prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingRole {
    User,
    Assistant,
}

impl SamplingRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single role-tagged text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingMessage {
    pub role: SamplingRole,
    pub text: String,
}

impl SamplingMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: SamplingRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: SamplingRole::Assistant,
            text: text.into(),
        }
    }
}

/// Request sent to a sampling endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingRequest {
    /// Conversation turns in original order.
    pub messages: Vec<SamplingMessage>,
    /// Concatenated system content, `None` when the caller sent none.
    pub system_prompt: Option<String>,
    /// Upper bound on generated tokens. Always greater than zero.
    pub max_tokens: u32,
    /// `None` lets the host pick its own default.
    pub temperature: Option<f32>,
    /// Ordered model-name preferences.
    pub model_hints: Option<Vec<String>>,
    pub stop_sequences: Option<Vec<String>>,
}

/// Content returned by a sampling endpoint.
///
/// Only [`SampledContent::Text`] carries anything the Ollama surface can
/// show; every other kind degrades to empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampledContent {
    Text(String),
    Image { mime_type: String },
    Audio { mime_type: String },
    Other,
}

/// Result of a completed sampling call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplingResult {
    pub content: Option<SampledContent>,
    /// Raw upstream stop reason (e.g. `endTurn`, `maxTokens`).
    pub stop_reason: Option<String>,
    /// Model the host reports having used.
    pub model: Option<String>,
}

impl SamplingResult {
    /// Convenience constructor for a plain text result.
    pub fn text(text: impl Into<String>, stop_reason: impl Into<String>) -> Self {
        Self {
            content: Some(SampledContent::Text(text.into())),
            stop_reason: Some(stop_reason.into()),
            model: None,
        }
    }
}
