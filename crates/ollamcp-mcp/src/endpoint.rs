//! Sampling endpoint backed by a live MCP session.

use async_trait::async_trait;
use ollamcp_core::{
    SampledContent, SamplingEndpoint, SamplingError, SamplingRequest, SamplingResult, SamplingRole,
};
use rmcp::{
    Peer, RoleServer,
    model::{
        Content, CreateMessageRequestParam, CreateMessageResult, ModelHint, ModelPreferences,
        RawContent, Role, SamplingMessage,
    },
    service::ServiceError,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// An initialized MCP host session that can answer `sampling/createMessage`.
#[derive(Clone)]
pub struct McpEndpoint {
    id: String,
    peer: Peer<RoleServer>,
}

impl McpEndpoint {
    pub const fn new(id: String, peer: Peer<RoleServer>) -> Self {
        Self { id, peer }
    }
}

impl std::fmt::Debug for McpEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpEndpoint")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SamplingEndpoint for McpEndpoint {
    fn id(&self) -> &str {
        &self.id
    }

    async fn sample(
        &self,
        request: SamplingRequest,
        cancel: CancellationToken,
    ) -> Result<SamplingResult, SamplingError> {
        let params = to_create_message_params(request);
        tokio::select! {
            result = self.peer.create_message(params) => {
                let result = result.map_err(sampling_error)?;
                Ok(from_create_message_result(result))
            }
            () = cancel.cancelled() => {
                debug!(endpoint_id = %self.id, "Sampling call abandoned");
                Err(SamplingError::Cancelled)
            }
        }
    }
}

fn sampling_error(err: ServiceError) -> SamplingError {
    match err {
        ServiceError::TransportClosed => SamplingError::Closed,
        other => SamplingError::Upstream(other.to_string()),
    }
}

/// Build the MCP wire request.
///
/// Model names go out as hints only; the host is free to ignore them.
fn to_create_message_params(request: SamplingRequest) -> CreateMessageRequestParam {
    let messages = request
        .messages
        .into_iter()
        .map(|msg| SamplingMessage {
            role: match msg.role {
                SamplingRole::User => Role::User,
                SamplingRole::Assistant => Role::Assistant,
            },
            content: Content::text(msg.text),
        })
        .collect();

    let model_preferences = request.model_hints.map(|names| ModelPreferences {
        hints: Some(
            names
                .into_iter()
                .map(|name| ModelHint { name: Some(name) })
                .collect(),
        ),
        cost_priority: None,
        speed_priority: None,
        intelligence_priority: None,
    });

    CreateMessageRequestParam {
        messages,
        model_preferences,
        system_prompt: request.system_prompt,
        include_context: None,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        stop_sequences: request.stop_sequences,
        metadata: None,
    }
}

fn from_create_message_result(result: CreateMessageResult) -> SamplingResult {
    SamplingResult {
        content: Some(sampled_content(&result.message.content)),
        stop_reason: result.stop_reason,
        model: (!result.model.is_empty()).then_some(result.model),
    }
}

fn sampled_content(content: &Content) -> SampledContent {
    match &content.raw {
        RawContent::Text(text) => SampledContent::Text(text.text.clone()),
        RawContent::Image(image) => SampledContent::Image {
            mime_type: image.mime_type.clone(),
        },
        RawContent::Audio(audio) => SampledContent::Audio {
            mime_type: audio.mime_type.clone(),
        },
        _ => SampledContent::Other,
    }
}
