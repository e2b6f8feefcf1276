mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use docscrub_config::Config;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        cli::Commands::Redact {
            input,
            output,
            backend,
            json,
        } => commands::redact::handle(with_backend(config, backend), input, output, json).await,
        cli::Commands::Analyze {
            text,
            backend,
            json,
        } => commands::analyze::handle(with_backend(config, backend), text, json).await,
        cli::Commands::Formats => commands::formats::handle(),
        cli::Commands::Config { path } => {
            commands::config::handle(&config, cli.config.as_deref(), path)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn with_backend(mut config: Config, backend: Option<cli::Backend>) -> Config {
    if let Some(backend) = backend {
        config.detector.backend = backend.into();
    }
    config
}
