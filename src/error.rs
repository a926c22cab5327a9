//! Error types for lumina-rs
//!
//! This module provides the error taxonomy shared by every layer: verse index
//! lookups, reference decoding, dataset federation, search and the request API.

use thiserror::Error;

/// Main error type for lumina operations
#[derive(Error, Debug)]
pub enum LuminaError {
    /// Book, chapter or verse outside the canonical table, or an id outside [1, 31102]
    #[error("Reference not found: {0}")]
    ReferenceOutOfRange(String),

    /// An encoded reference token that could not be resolved
    #[error("Unresolvable reference: {0}")]
    DecodeFailure(String),

    /// A dataset alias that is not attached or whose backing store is missing
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// A book name the books table does not know
    #[error("Unknown book: {0}")]
    UnknownBook(String),

    /// Malformed or missing request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A well-formed request that matched nothing where a row is required
    #[error("{0}")]
    NotFound(String),

    /// Database/storage errors with context
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl LuminaError {
    /// Whether the error means "nothing there" rather than "something broke"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LuminaError::ReferenceOutOfRange(_) | LuminaError::UnknownBook(_) | LuminaError::NotFound(_)
        )
    }
}

/// Result type alias for lumina operations
pub type Result<T> = std::result::Result<T, LuminaError>;
