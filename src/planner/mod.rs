//! Rip planning module

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::domain::model::DiscKind;

pub mod strategy;

pub use strategy::{build_plan, RipPlanner};

/// External program able to copy a title off a disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Dvdbackup,
    Ffmpeg,
}

impl Backend {
    /// Selection order when several backends are installed
    pub const PRIORITY: [Backend; 2] = [Backend::Dvdbackup, Backend::Ffmpeg];

    /// Executable name looked up on `PATH`
    pub fn command(&self) -> &'static str {
        match self {
            Backend::Dvdbackup => "dvdbackup",
            Backend::Ffmpeg => "ffmpeg",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Backend chosen for a plan item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelection {
    Selected(Backend),
    /// Nothing usable was found; only fatal when executing for real
    NoBackendAvailable,
}

impl ToolSelection {
    /// First backend of `available` in priority order
    pub fn from_available(available: &[Backend]) -> Self {
        Backend::PRIORITY
            .iter()
            .copied()
            .find(|backend| available.contains(backend))
            .map(ToolSelection::Selected)
            .unwrap_or(ToolSelection::NoBackendAvailable)
    }

    pub fn backend(&self) -> Option<Backend> {
        match self {
            ToolSelection::Selected(backend) => Some(*backend),
            ToolSelection::NoBackendAvailable => None,
        }
    }
}

impl fmt::Display for ToolSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolSelection::Selected(backend) => fmt::Display::fmt(backend, f),
            ToolSelection::NoBackendAvailable => f.write_str("no backend available"),
        }
    }
}

impl Serialize for ToolSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One planned rip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RipPlanItem {
    pub title_index: u32,
    pub destination_path: PathBuf,
    pub episode_code: Option<String>,
    pub tool: ToolSelection,
    pub dry_run: bool,
}

/// Ordered rip actions for one disc
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RipPlan {
    pub kind: DiscKind,
    pub ambiguous: bool,
    pub items: Vec<RipPlanItem>,
}

impl RipPlan {
    /// Directory receiving `metadata.json`: the parent of the first destination
    pub fn output_root(&self) -> Option<&Path> {
        self.items
            .first()
            .and_then(|item| item.destination_path.parent())
    }

    pub fn is_dry_run(&self) -> bool {
        self.items.iter().any(|item| item.dry_run)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
