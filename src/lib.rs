//! discripper library
//!
//! Inspects an optical disc, decides whether it holds a movie or a series,
//! builds collision-free output names and rips each title with an external
//! backend (`dvdbackup` or `ffmpeg`).
//!
//! The core pipeline is pure:
//!
//! ```text
//! DiscInfo -> classify -> ClassificationResult -> build_plan -> RipPlan
//! ```
//!
//! Everything that touches processes or the filesystem sits behind the
//! traits in [`ports`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod naming;
pub mod output;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{ClassificationResult, DiscInfo, DiscKind, EpisodeAssignment, TitleInfo};
pub use domain::rules::{classify, ClassificationThresholds};
pub use error::{DiscRipperError, DiscRipperResult};
pub use naming::{ensure_unique_path, movie_output_path, sanitize_component, series_output_path, NamingConfig};
pub use planner::{build_plan, Backend, RipPlan, RipPlanItem, ToolSelection};
