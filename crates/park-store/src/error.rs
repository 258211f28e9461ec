//! Errors raised while reading or writing the lot document.

use std::path::PathBuf;

use park_state::InvariantViolation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("document has an invalid shape: {0}")]
    Shape(#[source] serde_json::Error),

    /// Backup text lacks a collection every backup must carry.
    #[error("backup is missing the `{0}` array")]
    MissingCollection(&'static str),

    #[error("document breaks {} invariant(s); first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Integrity(Vec<InvariantViolation>),

    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}
