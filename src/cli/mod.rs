//! CLI module for discripper
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::CliOverrides;
use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

pub use args::{InspectArgs, RipArgs};

/// discripper
///
/// Classifies an optical disc as a movie or a series, names the outputs and
/// rips them with dvdbackup or ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "discripper")]
#[command(about = "Classify discs as movies or series and rip them with predictable names")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect, classify, plan and rip a disc
    Rip(RipArgs),
    /// Show the classification and plan without ripping
    Inspect(InspectArgs),
}

impl Cli {
    /// Configuration values supplied on the command line
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            config_path: self.config.clone(),
            verbose: self.verbose,
            log_format: self.log_format,
            ..CliOverrides::default()
        };

        if let Commands::Rip(args) = &self.command {
            overrides.output_directory = args.output_dir.clone();
            overrides.title = args.title.clone();
            overrides.dry_run = args.dry_run;
            overrides.compression = args.compress;
        }
        overrides
    }
}
