//! Chartwise CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use chartwise_config::load_config;
use chartwise_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = cli.log_level.as_str();

    match cli.command {
        Commands::ValidateConfig => {
            let _guard = setup_logging(log_level, cli.json_logs, true, None)?;
            cli::commands::validate::run(&cli.config).await
        }
        Commands::Guide => cli::commands::guide::run(),
        command => {
            let config = load_config(&cli.config)
                .with_context(|| format!("Failed to load {}", cli.config.display()))?;
            config.validate()?;

            // The dashboard owns the terminal, so console logs are dropped while it runs
            let json = cli.json_logs || config.logging.format == "json";
            let _guard = setup_logging(
                log_level,
                json,
                !command.uses_dashboard(),
                config.logging.file.as_deref().map(Path::new),
            )?;

            match command {
                Commands::Analyze(args) => cli::commands::analyze::run(args, &config).await,
                Commands::Live(args) => cli::commands::live::run(args, &config).await,
                Commands::Indicators(args) => cli::commands::indicators::run(args, &config).await,
                Commands::Guide | Commands::ValidateConfig => Ok(()),
            }
        }
    }
}
