//! Tantivy client error types.

use index_sync_core::SyncError;
use thiserror::Error;

/// Errors that can occur while writing to the Tantivy index.
#[derive(Debug, Error)]
pub enum TantivyClientError {
    /// Tantivy index error
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema mismatch
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Writer lock poisoned by a panicking holder
    #[error("Index is locked: {0}")]
    IndexLocked(String),
}

impl From<TantivyClientError> for SyncError {
    fn from(err: TantivyClientError) -> Self {
        SyncError::Index(format!("tantivy: {}", err))
    }
}
