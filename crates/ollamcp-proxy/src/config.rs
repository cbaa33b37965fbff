//! Proxy configuration.

/// Version reported by `/api/version` unless overridden.
///
/// Some clients (the VS Code Ollama extension among them) refuse servers
/// older than 0.6.4.
pub const DEFAULT_API_VERSION: &str = "0.6.4";

/// Fallback `max_tokens` when a request carries no positive `num_predict`.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Settings the Ollama gateway needs at request time.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Always greater than zero.
    pub default_max_tokens: u32,
    /// Model names advertised by `/api/tags`.
    pub models: Vec<String>,
    pub api_version: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            default_max_tokens: DEFAULT_MAX_TOKENS,
            models: vec!["default".to_string()],
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ProxyConfig {
    /// Whether `name` (with or without `:latest`) is advertised.
    pub fn advertises(&self, name: &str) -> bool {
        let wanted = crate::ollama_models::normalize_model_name(name);
        self.models
            .iter()
            .any(|m| crate::ollama_models::normalize_model_name(m) == wanted)
    }
}
