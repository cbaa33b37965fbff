//! Ollama API data models.
//!
//! Request types are lenient: unknown fields are ignored and most fields
//! default, so the many Ollama clients in the wild all decode. Response types
//! skip empty accounting fields so that streamed content frames stay small.

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

/// Body of `GET /`.
pub const OLLAMA_ROOT_RESPONSE: &str = "Ollama is running";

// ── Shared ─────────────────────────────────────────────────────────────

/// Generation options shared by `/api/chat` and `/api/generate`.
///
/// Only the options with a sampling counterpart are decoded; the rest
/// (`num_ctx`, `top_k`, `seed`, ...) are accepted and dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaOptions {
    /// Max tokens to generate. `<= 0` means "no override".
    #[serde(default)]
    pub num_predict: Option<i64>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub stop: Option<Vec<String>>,
}

/// Why generation ended, as Ollama reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoneReason {
    Stop,
    Length,
    /// Reply to a preload probe; nothing was generated.
    Load,
}

// ── /api/chat ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChatMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Base64 images. Not forwarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl OllamaChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            images: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<OllamaChatMessage>,
    /// Defaults to streaming when absent.
    #[serde(default)]
    pub stream: Option<bool>,
    #[serde(default)]
    pub options: Option<OllamaOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChatResponse {
    pub model: String,
    pub created_at: String,
    pub message: OllamaChatMessage,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<DoneReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_duration: Option<u64>,
}

// ── /api/generate ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaGenerateRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub stream: Option<bool>,
    #[serde(default)]
    pub options: Option<OllamaOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaGenerateResponse {
    pub model: String,
    pub created_at: String,
    pub response: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<DoneReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_duration: Option<u64>,
}

// ── /api/tags, /api/ps, /api/show ──────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaModelDetails {
    pub format: String,
    pub family: String,
    pub parameter_size: String,
    pub quantization_level: String,
}

impl OllamaModelDetails {
    /// Details for a model whose weights live on the MCP host, not here.
    fn remote() -> Self {
        Self {
            format: "mcp".to_string(),
            family: String::new(),
            parameter_size: String::new(),
            quantization_level: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaModelEntry {
    pub name: String,
    pub model: String,
    pub modified_at: String,
    pub size: u64,
    pub digest: String,
    pub details: OllamaModelDetails,
}

impl OllamaModelEntry {
    pub fn advertised(name: &str, modified_at: &str) -> Self {
        Self {
            name: name.to_string(),
            model: name.to_string(),
            modified_at: modified_at.to_string(),
            size: 0,
            digest: synthetic_digest(name),
            details: OllamaModelDetails::remote(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaTagsResponse {
    pub models: Vec<OllamaModelEntry>,
}

impl OllamaTagsResponse {
    pub fn from_names(names: &[String], modified_at: &str) -> Self {
        Self {
            models: names
                .iter()
                .map(|name| OllamaModelEntry::advertised(name, modified_at))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaPsEntry {
    pub name: String,
    pub model: String,
    pub size: u64,
    pub digest: String,
    pub details: OllamaModelDetails,
    pub expires_at: String,
    pub size_vram: u64,
}

impl OllamaPsEntry {
    pub fn attached(name: &str) -> Self {
        Self {
            name: name.to_string(),
            model: name.to_string(),
            size: 0,
            digest: synthetic_digest(name),
            details: OllamaModelDetails::remote(),
            expires_at: "0001-01-01T00:00:00Z".to_string(),
            size_vram: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaPsResponse {
    pub models: Vec<OllamaPsEntry>,
}

/// `/api/show` accepts the model under either `model` or the older `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaShowRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl OllamaShowRequest {
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            &self.name
        } else {
            &self.model
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaShowResponse {
    pub modelfile: String,
    pub parameters: String,
    pub template: String,
    pub details: OllamaModelDetails,
    pub model_info: serde_json::Value,
    pub capabilities: Vec<String>,
    pub modified_at: String,
}

impl OllamaShowResponse {
    pub fn advertised(name: &str, modified_at: &str) -> Self {
        Self {
            modelfile: format!("# Served over MCP sampling\nFROM {name}\n"),
            parameters: String::new(),
            template: "{{ .Prompt }}".to_string(),
            details: OllamaModelDetails::remote(),
            model_info: serde_json::json!({ "general.architecture": "mcp" }),
            capabilities: vec!["completion".to_string()],
            modified_at: modified_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaVersionResponse {
    pub version: String,
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strip the implicit `:latest` tag so `llama3` and `llama3:latest` match.
pub fn normalize_model_name(name: &str) -> &str {
    name.strip_suffix(":latest").unwrap_or(name)
}

/// Stable `sha256:<hex>` digest derived from the model name.
///
/// There are no weights to hash; clients only need the value to be stable.
pub fn synthetic_digest(name: &str) -> String {
    let hash = Sha256::digest(name.as_bytes());
    let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();
    format!("sha256:{hex}")
}
