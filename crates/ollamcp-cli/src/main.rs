//! ollamcp entry point.

use clap::Parser;

use ollamcp_cli::{BridgeConfig, Cli, init_tracing, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before parsing so clap's env fallbacks see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = BridgeConfig::from_cli(&cli)?;
    run(config).await
}
