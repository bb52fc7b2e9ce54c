//! Error types for the core library.

use thiserror::Error;

use crate::account::AccountId;
use crate::codec::CodecError;

/// Errors that can occur in core operations.
///
/// Transport failures and protocol statuses are not errors; they are reported
/// through [`crate::PingOutcome`]. An `Error` aborts the current call only.
#[derive(Debug, Error)]
pub enum Error {
    /// The folder registry could not be read for this account.
    #[error("Folder metadata unavailable for account {account}: {source}")]
    MetadataUnavailable {
        /// Account whose folders were requested.
        account: AccountId,
        /// Underlying registry failure.
        #[source]
        source: Box<Error>,
    },

    /// The request could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[source] CodecError),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps a backend error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
