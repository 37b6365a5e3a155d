// Domain errors - Error kinds raised by the classification/naming core

use std::fmt;

/// Domain-specific error types
///
/// Each variant carries the offending value so the caller can render its own
/// message; the core never formats user-facing text beyond `Display`.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Disc description is empty or malformed
    Validation { reason: String, value: String },
    /// Sanitization could not produce a usable path segment
    Naming { input: String },
    /// An episode references a title that is not on the disc
    UnknownTitle { index: u32 },
}

impl DomainError {
    /// Shorthand for a validation failure
    pub fn validation(reason: impl Into<String>, value: impl fmt::Display) -> Self {
        DomainError::Validation {
            reason: reason.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation { reason, value } => {
                write!(f, "Invalid disc description: {} ({})", reason, value)
            }
            DomainError::Naming { input } => {
                write!(f, "Cannot derive a safe file name from {:?}", input)
            }
            DomainError::UnknownTitle { index } => {
                write!(f, "Title {} is not present on the disc", index)
            }
        }
    }
}

impl std::error::Error for DomainError {}
