mod cli;
mod commands;
mod error;
mod render;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    commands::run(cli.command, config).await
}
