//! Wire codec interface.
//!
//! The byte layout of Ping requests and responses is owned by the embedding
//! application. The core only needs a request encoder and a response decoder.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::request::PingRequest;
use crate::status::PingStatus;

/// Errors produced by a [`PingCodec`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The request could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// The response body could not be parsed.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Parsed Ping response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    /// Status code.
    pub status: PingStatus,
    /// Server ids of changed folders (changes found only).
    #[serde(default)]
    pub folders: Vec<String>,
    /// Heartbeat the server will accept (heartbeat out of bounds only).
    #[serde(default)]
    pub heartbeat_interval: Option<u64>,
    /// Maximum number of folders the server will watch (too many folders only).
    #[serde(default)]
    pub max_folders: Option<u32>,
}

impl PingResponse {
    /// Creates a response carrying only a status.
    #[must_use]
    pub const fn with_status(status: PingStatus) -> Self {
        Self {
            status,
            folders: Vec::new(),
            heartbeat_interval: None,
            max_folders: None,
        }
    }
}

/// Encodes Ping requests and decodes Ping responses.
pub trait PingCodec: Send + Sync {
    /// Serializes a request into wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the request cannot be represented.
    fn encode(&self, request: &PingRequest) -> Result<Bytes, CodecError>;

    /// Parses a non-empty response body.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if the body is not a valid response.
    fn decode(&self, body: &[u8]) -> Result<PingResponse, CodecError>;
}
