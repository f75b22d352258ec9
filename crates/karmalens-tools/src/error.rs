//! Error types for the tool provider boundary.

use thiserror::Error;

/// Errors that make the tool provider unusable for a session.
#[derive(Debug, Error)]
pub enum ToolProviderError {
    /// The server subprocess could not be spawned.
    #[error("failed to launch tool server: {0}")]
    Spawn(#[from] std::io::Error),
    /// The protocol handshake or tool discovery failed.
    #[error("tool server handshake failed: {0}")]
    Handshake(String),
    /// A request to the running server failed.
    #[error("tool call failed: {0}")]
    Call(String),
    /// The server did not shut down cleanly.
    #[error("tool server shutdown failed: {0}")]
    Shutdown(String),
}
