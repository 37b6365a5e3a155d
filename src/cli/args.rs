//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Device used when none is given
pub const DEFAULT_DEVICE: &str = "/dev/sr0";

/// Arguments for the rip command
#[derive(Args, Debug)]
pub struct RipArgs {
    /// Optical drive device path
    #[arg(default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Read the disc layout from a JSON fixture (implies --dry-run)
    #[arg(long, value_name = "FIXTURE")]
    pub simulate: Option<PathBuf>,

    /// Root directory for ripped files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Movie or series name to use instead of the disc label
    #[arg(long)]
    pub title: Option<String>,

    /// Log a HandBrake compression plan for each ripped file
    #[arg(long)]
    pub compress: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Optical drive device path
    #[arg(default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Read the disc layout from a JSON fixture
    #[arg(long, value_name = "FIXTURE")]
    pub simulate: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
