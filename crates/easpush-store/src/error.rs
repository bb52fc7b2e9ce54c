//! Error types for the store.

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value cannot be stored.
    #[error("Value out of range: {0}")]
    OutOfRange(u64),

    /// A stored value could not be interpreted.
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl From<Error> for easpush_core::Error {
    fn from(err: Error) -> Self {
        Self::storage(err)
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
