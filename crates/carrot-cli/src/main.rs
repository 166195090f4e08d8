use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use carrot_dashboard::DashboardConfig;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carrot_cli=info,carrot_dashboard=info,carrot_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = DashboardConfig::from_env()?;

    // Flags win over the environment
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    if let Some(interval) = cli.interval {
        config.poll_interval_secs = interval;
    }
    if let Commands::Serve { port, host } = &cli.command {
        if let Some(port) = port {
            config.port = *port;
        }
        if let Some(host) = host {
            config.host = host.clone();
        }
    }

    commands::execute(cli.command, config).await
}
