//! Ollama-compatible HTTP gateway for ollamcp.
//!
//! Requests arrive in Ollama's `/api/*` dialect, are translated into MCP
//! sampling requests, run on whichever host the [`EndpointRegistry`] says is
//! current, and are answered in Ollama's response shapes.
//!
//! [`EndpointRegistry`]: ollamcp_core::EndpointRegistry

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub(crate) mod ollama_handlers;
pub mod ollama_models;
pub mod ollama_stream;
pub mod server;
pub mod translate;

pub use config::ProxyConfig;
pub use error::GatewayError;
pub use server::{create_router, serve};
