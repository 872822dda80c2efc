//! Error types for the store and the sync engine

use musicociel_babel::ConvertError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a [`crate::store::DocumentStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write was based on a stale or missing revision, or the id is
    /// already taken by a live document.
    #[error("document update conflict for {id:?}")]
    Conflict { id: String },
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid document body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Failures that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("error reading '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error importing '{}': {source}", path.display())]
    Convert {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },
    #[error("error building the record for '{}': {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
