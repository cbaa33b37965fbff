//! Gateway error types and their HTTP mapping.
//!
//! Every error is terminal for its request and rendered Ollama-style as
//! `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ollamcp_core::SamplingError;
use thiserror::Error;

/// Errors a gateway handler can end a request with.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body did not decode as the expected request schema.
    #[error("invalid JSON: {0}")]
    InvalidRequest(String),

    /// No MCP host is attached.
    #[error("MCP host not connected")]
    NoEndpoint,

    /// The sampling call itself failed.
    #[error("sampling failed: {0}")]
    Sampling(#[from] SamplingError),

    #[error("model '{0}' not found")]
    ModelNotFound(String),
}

impl GatewayError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoEndpoint => StatusCode::SERVICE_UNAVAILABLE,
            Self::Sampling(_) => StatusCode::BAD_GATEWAY,
            Self::ModelNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::InvalidRequest("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GatewayError::NoEndpoint.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            GatewayError::Sampling(SamplingError::Cancelled).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::ModelNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_sampling_message_wraps_upstream_text() {
        let err = GatewayError::from(SamplingError::Upstream("mcp failure".into()));
        assert_eq!(err.to_string(), "sampling failed: mcp failure");
    }

    #[test]
    fn test_parse_errors_become_invalid_request() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = GatewayError::from(parse);
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
        assert!(err.to_string().starts_with("invalid JSON: "));
    }
}
