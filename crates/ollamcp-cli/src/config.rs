//! Validated runtime configuration.

use ollamcp_proxy::ProxyConfig;
use thiserror::Error;

use crate::parser::{Cli, McpTransport};

/// Configuration errors caught before anything is bound.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--models must name at least one model")]
    NoModels,

    #[error("--default-max-tokens must be at least 1")]
    ZeroMaxTokens,
}

/// Everything `run` needs, checked once at startup.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    pub mcp_transport: McpTransport,
    pub mcp_port: u16,
    pub proxy: ProxyConfig,
}

impl BridgeConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.default_max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }
        let models = parse_models(&cli.models)?;

        Ok(Self {
            host: cli.host.clone(),
            port: cli.port,
            mcp_transport: cli.mcp_transport,
            mcp_port: cli.mcp_port,
            proxy: ProxyConfig {
                default_max_tokens: cli.default_max_tokens,
                models,
                api_version: cli.api_version.clone(),
            },
        })
    }
}

/// Split a comma-separated model list, trimming blanks and dropping empties.
pub fn parse_models(raw: &str) -> Result<Vec<String>, ConfigError> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();

    if models.is_empty() {
        Err(ConfigError::NoModels)
    } else {
        Ok(models)
    }
}
