//! Transport interface.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

/// Ways a long-poll can fail before yielding a usable body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No response arrived before the deadline.
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),

    /// The connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server answered with an empty body.
    #[error("Server returned an empty body")]
    EmptyBody,

    /// The body could not be decoded.
    #[error("Unusable response: {0}")]
    Unusable(String),
}

/// Sends one encoded Ping request and waits for the response body.
///
/// Implementations handle HTTP, authentication and session state. The core
/// also enforces `timeout` itself, so implementations may treat it as a hint.
pub trait Transport: Send + Sync {
    /// Sends `payload` and waits up to `timeout` for the response body.
    fn send(
        &self,
        payload: Bytes,
        timeout: Duration,
    ) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}
