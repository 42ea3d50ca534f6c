//! Stock screener CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use screener_config::{load_config, AppConfig};
use screener_monitor::{setup_logging, LogFormat};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        load_config(&cli.config)
            .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level.as_str().to_string();
    }
    if cli.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(dir) = &cli.data {
        config.data.dir = dir.clone();
    }

    if !matches!(cli.command, Commands::ValidateConfig) {
        config.validate().context("Invalid configuration")?;
    }

    // Setup logging
    let format = config
        .logging
        .format
        .parse::<LogFormat>()
        .map_err(anyhow::Error::msg)?;
    let _guard = setup_logging(
        &config.logging.level,
        format,
        config.logging.file.as_deref().map(Path::new),
    );

    // Execute command
    match cli.command {
        Commands::List(args) => cli::commands::list::run(args, &config).await,
        Commands::Aggregate(args) => cli::commands::aggregate::run(args, &config).await,
        Commands::Session(args) => cli::commands::session::run(args, &config).await,
        Commands::Explain(args) => cli::commands::explain::run(args, &config).await,
        Commands::ResolveRange(args) => cli::commands::resolve::run(args, &config).await,
        Commands::Fields => cli::commands::fields::run().await,
        Commands::Distinct(args) => cli::commands::distinct::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config).await,
    }
}
