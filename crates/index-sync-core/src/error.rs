//! Error types for index synchronization.

use thiserror::Error;

/// Errors surfaced by collaborators of the sync engine.
///
/// The engine itself never returns these to event or trigger callers;
/// commit failures are absorbed and reported through the diagnostic sink.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bulk index operation failed
    #[error("Index error: {0}")]
    Index(String),

    /// JSON encoding/decoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The index backend could not be reached
    #[error("Index unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}
