mod bootstrap;
mod cli;
mod commands;
mod console;
mod dev;
mod settings;

use admin_client::ClientConfig;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

use bootstrap::Backend;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let command = match cli.command {
        Commands::ConfigPath => return commands::config_path(),
        command => command,
    };

    let backend = if cli.dev {
        Backend::dev()
    } else {
        let config = settings::read_config(&ClientConfig::config_path()?, None)?;
        Backend::remote(&config)?
    };

    commands::run(command, backend).await
}
