// Ports - Interface definitions (contracts)

use std::io;
use std::path::PathBuf;

use crate::domain::model::*;
use crate::error::DiscRipperResult;
use crate::planner::Backend;

/// Port for locating external commands
pub trait ToolDiscovery {
    /// Absolute path of `command`, if it can be run
    fn locate(&self, command: &str) -> Option<PathBuf>;

    /// Ripping backends that can be run, in priority order
    fn available_backends(&self) -> Vec<Backend> {
        Backend::PRIORITY
            .iter()
            .copied()
            .filter(|backend| self.locate(backend.command()).is_some())
            .collect()
    }
}

/// Captured result of one external command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code; absent when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// First non-empty line of stdout, else of stderr
    pub fn first_line(&self) -> Option<&str> {
        [self.stdout.as_str(), self.stderr.as_str()]
            .into_iter()
            .flat_map(str::lines)
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Port for running external commands to completion
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Port for reading a disc layout
pub trait DiscInspector {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    fn inspect(&self, device: &str) -> DiscRipperResult<DiscInfo>;
}

/// Metadata about a disc from an online catalogue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscMetadata {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub episodes: Vec<EpisodeMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeMetadata {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub season: Option<u32>,
    pub number: Option<u32>,
}

/// Outcome of a metadata lookup
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataLookup {
    pub provider: String,
    pub metadata: Option<DiscMetadata>,
    pub message: Option<String>,
}

impl MetadataLookup {
    pub fn found(&self) -> bool {
        self.metadata.is_some()
    }
}

/// Port for disc metadata providers
pub trait MetadataProvider {
    fn name(&self) -> &str;

    fn lookup_disc(&self, disc: &DiscInfo) -> MetadataLookup;
}
