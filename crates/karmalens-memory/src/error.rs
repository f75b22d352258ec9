//! Error types for memory store access.

use thiserror::Error;

/// Errors returned by memory store operations.
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    /// Transport-level HTTP failure.
    #[error("memory store request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("memory store rejected the request (status={status}): {message}")]
    Api { status: u16, message: String },
    /// A response body could not be decoded.
    #[error("failed to decode memory store response: {0}")]
    Decode(#[from] serde_json::Error),
}
