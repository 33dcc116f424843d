//! Data-store errors
//!
//! The only hard failure class of a search. Nothing above the store retries.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Corpus store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot file could not be read or written
    #[error("Corpus snapshot I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot content is not a valid corpus
    #[error("Corpus snapshot is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The backing store cannot serve reads right now
    #[error("Corpus store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
