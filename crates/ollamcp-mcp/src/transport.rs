//! MCP transports: a single stdio session or streamable HTTP sessions.

use std::sync::Arc;

use axum::Router;
use ollamcp_core::EndpointRegistry;
use rmcp::{
    ServiceExt,
    transport::{
        stdio,
        streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
    },
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::handler::SamplingBridgeHandler;

/// Mount point of the streamable HTTP transport.
pub const MCP_HTTP_PATH: &str = "/mcp";

/// Serve one MCP session over stdin/stdout.
///
/// Returns when the host closes the session or `cancel` fires. Nothing else
/// may write to stdout while this runs.
pub async fn serve_stdio(
    registry: Arc<EndpointRegistry>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let handler = SamplingBridgeHandler::new(registry);
    info!(endpoint_id = %handler.endpoint_id(), "Waiting for MCP host on stdio");

    let service = tokio::select! {
        service = handler.serve_with_ct(stdio(), cancel.child_token()) => service?,
        () = cancel.cancelled() => {
            info!("Shutdown requested before the MCP host connected");
            return Ok(());
        }
    };

    let reason = service.waiting().await?;
    info!(?reason, "MCP stdio session ended");
    Ok(())
}

/// Serve MCP sessions over streamable HTTP at [`MCP_HTTP_PATH`].
///
/// Every session gets its own handler and therefore its own endpoint.
pub async fn serve_http(
    listener: TcpListener,
    registry: Arc<EndpointRegistry>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;

    let service = StreamableHttpService::new(
        move || Ok(SamplingBridgeHandler::new(Arc::clone(&registry))),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = Router::new().nest_service(MCP_HTTP_PATH, service);

    info!("MCP streamable HTTP listening on http://{addr}{MCP_HTTP_PATH}");
    axum::serve(listener, router)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("MCP HTTP transport shut down");
    Ok(())
}
