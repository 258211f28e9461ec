//! # Error Types
//!
//! Top-level error for operations that cross a crate boundary: parsing
//! external input and (de)serializing the persisted document.
//! Domain-specific failures (spot, ticket, billing) have their own enums
//! in the crates that own those concerns.

use thiserror::Error;

/// Top-level error type for the parking engine.
#[derive(Error, Debug)]
pub enum ParkError {
    /// Input failed validation (bad timestamp, unknown enum tag, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
