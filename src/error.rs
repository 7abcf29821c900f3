//! Error types for the lessonkit library.

use std::io;
use thiserror::Error;

/// Result type alias for lessonkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while generating learning artifacts.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document could not be read or decoded.
    #[error("Unreadable document '{id}': {reason}")]
    UnreadableDocument { id: String, reason: String },

    /// A category label that is not part of the closed label set.
    #[error("Unknown category label: {0}")]
    UnknownCategory(String),

    /// A distribution table violates a load-time invariant.
    #[error("Invalid distribution table: {0}")]
    InvalidDistribution(String),

    /// An allocation request that cannot conserve its total.
    #[error("Allocation error: {0}")]
    Allocation(String),

    /// No unit or frame template exists, even after fallback.
    #[error("Missing {kind} template: {name}")]
    MissingTemplate { kind: &'static str, name: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error serializing output (JSON).
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Build an `UnreadableDocument` error.
    pub fn unreadable(id: impl Into<String>, reason: impl ToString) -> Self {
        Error::UnreadableDocument {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
