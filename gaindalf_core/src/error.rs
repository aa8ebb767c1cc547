//! Error types for the gaindalf_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gaindalf_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A referenced entity does not exist (or there is nothing to choose from)
    #[error("{0}")]
    NotFound(String),

    /// The entity graph is inconsistent
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A write was rejected
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    pub(crate) fn not_found(entity: &str, id: i64) -> Self {
        Error::NotFound(format!("{} {} not found", entity, id))
    }
}
