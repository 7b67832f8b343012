//! Error types for HRPoint

use crate::validation::ValidationError;
use thiserror::Error;

/// Failures reported by the persistence engine.
///
/// Store operations forward these untouched; they are never reinterpreted.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Collection not found: {name}")]
    CollectionNotFound { name: String },

    #[error("Collection already exists: {name}")]
    CollectionExists { name: String },

    #[error("Schema violation in {collection}: {reason}")]
    SchemaViolation { collection: String, reason: String },

    #[error("Session failed: {0}")]
    SessionFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum HrPointError {
    // Input errors
    #[error("{0}")]
    WrongDataFormat(#[from] ValidationError),

    // Engine errors
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HrPointError {
    /// True when the error was raised by input validation, before any engine call
    pub fn is_wrong_data_format(&self) -> bool {
        matches!(self, HrPointError::WrongDataFormat(_))
    }
}

pub type Result<T> = std::result::Result<T, HrPointError>;
