//! Per-session MCP server handler.

use std::future::Future;
use std::sync::Arc;

use ollamcp_core::{EndpointRegistry, SamplingEndpoint};
use rmcp::{
    RoleServer, ServerHandler,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    service::NotificationContext,
};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{info, warn};

use crate::endpoint::McpEndpoint;

/// MCP server handler for one host session.
///
/// The bridge exposes no tools or resources; it only exists so the host
/// connects and we can send it `sampling/createMessage` requests. The
/// endpoint is attached when the host sends `notifications/initialized` and
/// detached when rmcp drops this handler.
pub struct SamplingBridgeHandler {
    endpoint_id: String,
    registry: Arc<EndpointRegistry>,
    /// Fires when the handler is dropped.
    closed: CancellationToken,
    _close_on_drop: DropGuard,
}

impl SamplingBridgeHandler {
    pub fn new(registry: Arc<EndpointRegistry>) -> Self {
        let closed = CancellationToken::new();
        Self {
            endpoint_id: uuid::Uuid::new_v4().to_string(),
            registry,
            _close_on_drop: closed.clone().drop_guard(),
            closed,
        }
    }

    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    /// Attach `endpoint` and detach it again once this session closes.
    async fn track_session(&self, endpoint: Arc<dyn SamplingEndpoint>) {
        self.registry.attach(endpoint).await;
        self.registry.spawn_close_observer(
            self.endpoint_id.clone(),
            self.closed.clone().cancelled_owned(),
        );
    }
}

impl std::fmt::Debug for SamplingBridgeHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplingBridgeHandler")
            .field("endpoint_id", &self.endpoint_id)
            .finish_non_exhaustive()
    }
}

impl ServerHandler for SamplingBridgeHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::default(),
            server_info: Implementation {
                name: "ollamcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Bridges Ollama API clients to this host. Requests arrive as sampling/createMessage calls."
                    .to_string(),
            ),
        }
    }

    fn on_initialized(
        &self,
        context: NotificationContext<RoleServer>,
    ) -> impl Future<Output = ()> + Send + '_ {
        async move {
            let peer = context.peer;
            match peer.peer_info() {
                Some(client) => {
                    if client.capabilities.sampling.is_none() {
                        warn!(
                            endpoint_id = %self.endpoint_id,
                            client = %client.client_info.name,
                            "MCP host did not advertise sampling; requests to it may fail"
                        );
                    }
                    info!(
                        endpoint_id = %self.endpoint_id,
                        client = %client.client_info.name,
                        client_version = %client.client_info.version,
                        "MCP host initialized"
                    );
                }
                None => info!(endpoint_id = %self.endpoint_id, "MCP host initialized"),
            }

            let endpoint = McpEndpoint::new(self.endpoint_id.clone(), peer);
            self.track_session(Arc::new(endpoint)).await;
        }
    }
}
