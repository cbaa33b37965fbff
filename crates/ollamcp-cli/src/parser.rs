//! Command-line flags.
//!
//! Every flag except `--verbose` can also come from an `OLLAMCP_*`
//! environment variable (or a `.env` file loaded before parsing).

use clap::{Parser, ValueEnum};
use ollamcp_proxy::config::{DEFAULT_API_VERSION, DEFAULT_MAX_TOKENS};

/// How MCP hosts reach the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum McpTransport {
    /// One host session over stdin/stdout.
    Stdio,
    /// Streamable HTTP sessions at `/mcp`.
    Http,
}

/// Expose an MCP host's model to Ollama clients.
#[derive(Debug, Parser)]
#[command(name = "ollamcp")]
#[command(about = "Serve the Ollama API by forwarding generations to an MCP host via sampling")]
#[command(version)]
pub struct Cli {
    /// Ollama API bind address
    #[arg(long, env = "OLLAMCP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Ollama API port
    #[arg(long, env = "OLLAMCP_PORT", default_value_t = 11434)]
    pub port: u16,

    /// Comma-separated model names advertised by /api/tags
    #[arg(long, env = "OLLAMCP_MODELS", default_value = "default")]
    pub models: String,

    /// max_tokens sent when a request has no positive num_predict
    #[arg(long = "default-max-tokens", env = "OLLAMCP_DEFAULT_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub default_max_tokens: u32,

    /// MCP transport the host connects over
    #[arg(long = "mcp-transport", env = "OLLAMCP_MCP_TRANSPORT", value_enum, default_value = "stdio")]
    pub mcp_transport: McpTransport,

    /// Port for the streamable HTTP MCP transport
    #[arg(long = "mcp-port", env = "OLLAMCP_MCP_PORT", default_value_t = 8081)]
    pub mcp_port: u16,

    /// Version reported by /api/version
    #[arg(long = "api-version", env = "OLLAMCP_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["ollamcp"]);
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, 11434);
        assert_eq!(cli.models, "default");
        assert_eq!(cli.default_max_tokens, 4096);
        assert_eq!(cli.mcp_transport, McpTransport::Stdio);
        assert_eq!(cli.mcp_port, 8081);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::parse_from([
            "ollamcp",
            "--host",
            "0.0.0.0",
            "--port",
            "11500",
            "--models",
            "llama3,codellama",
            "--default-max-tokens",
            "512",
            "--mcp-transport",
            "http",
            "--mcp-port",
            "9000",
            "--api-version",
            "0.9.0",
            "-v",
        ]);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.port, 11500);
        assert_eq!(cli.models, "llama3,codellama");
        assert_eq!(cli.default_max_tokens, 512);
        assert_eq!(cli.mcp_transport, McpTransport::Http);
        assert_eq!(cli.mcp_port, 9000);
        assert_eq!(cli.api_version, "0.9.0");
        assert!(cli.verbose);
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        let result = Cli::try_parse_from(["ollamcp", "--mcp-transport", "sse"]);
        assert!(result.is_err());
    }
}
