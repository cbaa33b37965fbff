//! Composition root: wires the registry, the Ollama API and the MCP
//! transport together and owns the shutdown sequence.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ollamcp_core::EndpointRegistry;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::BridgeConfig;
use crate::parser::McpTransport;

/// How long the Ollama API gets to finish in-flight requests on shutdown.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Run until the MCP side finishes or Ctrl-C / SIGTERM arrives.
pub async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let signals = tokio::spawn(cancel_on_signal(shutdown.clone()));

    let result = run_until(config, shutdown).await;
    signals.abort();
    result
}

/// Run until the MCP side finishes or `shutdown` fires.
///
/// With the stdio transport the bridge lives exactly as long as the host's
/// session; with HTTP it runs until shutdown.
pub async fn run_until(config: BridgeConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let registry = Arc::new(EndpointRegistry::new());

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| {
            format!(
                "failed to bind Ollama API on {}:{}",
                config.host, config.port
            )
        })?;

    let proxy = {
        let registry = Arc::clone(&registry);
        let shutdown = shutdown.clone();
        let proxy_config = config.proxy.clone();
        tokio::spawn(async move {
            let result =
                ollamcp_proxy::serve(listener, registry, proxy_config, shutdown.clone()).await;
            // A dead Ollama API leaves nothing to bridge.
            shutdown.cancel();
            result
        })
    };

    let mcp_result = match config.mcp_transport {
        McpTransport::Stdio => ollamcp_mcp::serve_stdio(registry, shutdown.clone()).await,
        McpTransport::Http => {
            let mcp_listener = TcpListener::bind((config.host.as_str(), config.mcp_port))
                .await
                .with_context(|| {
                    format!(
                        "failed to bind MCP transport on {}:{}",
                        config.host, config.mcp_port
                    )
                });
            match mcp_listener {
                Ok(listener) => {
                    ollamcp_mcp::serve_http(listener, registry, shutdown.clone()).await
                }
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = &mcp_result {
        error!("MCP transport failed: {e:#}");
    }

    shutdown.cancel();
    match tokio::time::timeout(SHUTDOWN_GRACE, proxy).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => error!("Ollama API failed: {e:#}"),
        Ok(Err(e)) => error!("Ollama API task panicked: {e}"),
        Err(_) => warn!("Ollama API did not stop within {SHUTDOWN_GRACE:?}"),
    }

    info!("Shutdown complete");
    mcp_result
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown requested");
    shutdown.cancel();
}
