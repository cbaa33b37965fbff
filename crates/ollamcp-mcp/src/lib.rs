//! MCP server side of ollamcp.
//!
//! Each MCP session gets its own [`SamplingBridgeHandler`]. Once the host
//! finishes initialization the session is wrapped in an [`McpEndpoint`] and
//! attached to the shared [`EndpointRegistry`]; when rmcp drops the handler
//! at session end the endpoint is detached again.
//!
//! [`EndpointRegistry`]: ollamcp_core::EndpointRegistry

#![deny(unused_crate_dependencies)]

mod endpoint;
mod handler;
mod transport;

pub use endpoint::McpEndpoint;
pub use handler::SamplingBridgeHandler;
pub use transport::{MCP_HTTP_PATH, serve_http, serve_stdio};
