//! discripper CLI
//!
//! Classifies an optical disc as a movie or a series and rips its titles with
//! predictable, collision-free names.
//!
//! # Usage
//!
//! ```bash
//! discripper rip /dev/sr0 --output-dir ~/Videos
//! discripper rip --simulate tests/fixtures/series.json
//! discripper inspect /dev/sr0 --json
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use discripper::app::DefaultAppContainer;
use discripper::cli::{commands, Cli, Commands};
use discripper::config_initialization::initialize_configuration_hierarchy;
use discripper::error::{exit_code_for, EXIT_SUCCESS, EXIT_UNEXPECTED_ERROR};
use discripper::utils::logging::init_logging;

/// Main entry point for the discripper CLI application
fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_UNEXPECTED_ERROR)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = initialize_configuration_hierarchy(&cli.overrides())
        .context("Failed to load configuration")?;
    init_logging(config.log_level(), config.logging.format)?;

    info!("Starting discripper");
    let container = DefaultAppContainer::new();

    match &cli.command {
        Commands::Rip(args) => commands::rip(args, &config, &container)?,
        Commands::Inspect(args) => commands::inspect(args, &config, &container)?,
    }

    info!("discripper completed successfully");
    Ok(())
}
