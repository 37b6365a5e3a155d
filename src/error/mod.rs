//! Error handling module for discripper

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Process exit code for a successful run
pub const EXIT_SUCCESS: u8 = 0;
/// Disc missing, unreadable, or inspection failed
pub const EXIT_DISC_NOT_DETECTED: u8 = 1;
/// Ripping failed after a valid plan was built
pub const EXIT_RIP_FAILED: u8 = 2;
/// Configuration errors and broken invariants
pub const EXIT_UNEXPECTED_ERROR: u8 = 3;

/// Main error type for discripper operations
#[derive(Error, Debug)]
pub enum DiscRipperError {
    /// Device path does not exist or cannot be read
    #[error("device path '{device}' not found or unreadable. Check that the disc is inserted and the device path is correct")]
    DiscNotDetected { device: String },

    #[error("No supported inspection tools found. Install 'lsdvd' or 'ffprobe' and try again")]
    NoInspectionTool,

    #[error("Blu-ray inspection is not supported yet; {tool}. Requested device: '{device}'")]
    BluRayNotSupported { device: String, tool: String },

    /// External inspection tool failed or printed something unexpected
    #[error("Failed to inspect disc with {tool}: {message}")]
    InspectionFailed { tool: String, message: String },

    #[error("Invalid duration: {time}. Expected seconds, MM:SS or HH:MM:SS.fff")]
    InvalidTimeFormat { time: String },

    /// Simulation fixture missing or malformed
    #[error("Failed to load simulation fixture {path:?}: {message}")]
    Fixture { path: PathBuf, message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Real run requested for an item without a usable backend
    #[error("No ripping backend available for title {title_index}. Install 'dvdbackup' or 'ffmpeg'")]
    NoBackendAvailable { title_index: u32 },

    #[error("Refusing to overwrite existing file: {path:?}")]
    DestinationExists { path: PathBuf },

    /// Backend exited unsuccessfully
    #[error("{tool} failed while ripping title {title_index}: {message}")]
    RipFailed {
        tool: String,
        title_index: u32,
        message: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiscRipperError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        DiscRipperError::Config {
            message: message.into(),
        }
    }

    /// Exit code reported by the binary for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            DiscRipperError::DiscNotDetected { .. }
            | DiscRipperError::NoInspectionTool
            | DiscRipperError::BluRayNotSupported { .. }
            | DiscRipperError::InspectionFailed { .. }
            | DiscRipperError::InvalidTimeFormat { .. }
            | DiscRipperError::Fixture { .. } => EXIT_DISC_NOT_DETECTED,
            DiscRipperError::NoBackendAvailable { .. }
            | DiscRipperError::DestinationExists { .. }
            | DiscRipperError::RipFailed { .. } => EXIT_RIP_FAILED,
            DiscRipperError::Config { .. }
            | DiscRipperError::Domain(_)
            | DiscRipperError::Io(_)
            | DiscRipperError::Json(_) => EXIT_UNEXPECTED_ERROR,
        }
    }
}

/// Result type alias for discripper operations
pub type DiscRipperResult<T> = std::result::Result<T, DiscRipperError>;

/// Exit code for an error reaching `main`, looking through any context
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DiscRipperError>())
        .map(DiscRipperError::exit_code)
        .unwrap_or(EXIT_UNEXPECTED_ERROR)
}
