//! Custom error types for backup-rotation
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for rotation operations
#[derive(Error, Debug)]
pub enum RotationError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for backup items
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Archive creation errors
    #[error("Archive error: {0}")]
    Archive(String),
}

impl RotationError {
    /// Create a "not found" error for the configuration file
    pub fn config_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Configuration file",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for directories
    pub fn directory_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Directory",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for RotationError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RotationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for rotation operations
pub type RotationResult<T> = Result<T, RotationError>;
