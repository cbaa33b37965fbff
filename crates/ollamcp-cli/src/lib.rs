//! ollamcp command-line crate.
//!
//! Parses flags, validates them into a [`BridgeConfig`], sets up logging and
//! runs the Ollama API and the MCP transport side by side until shutdown.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs binary
use dotenvy as _;

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod parser;

pub use bootstrap::{run, run_until};
pub use config::{BridgeConfig, ConfigError};
pub use logging::init_tracing;
pub use parser::{Cli, McpTransport};
