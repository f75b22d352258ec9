//! Error types for the language model boundary.

use thiserror::Error;

/// Errors returned while invoking the language model.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Transport-level HTTP failure or response decode failure.
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("chat request rejected (status={status}): {message}")]
    Api { status: u16, message: String },
    /// The request body could not be encoded.
    #[error("failed to encode chat request: {0}")]
    Encode(#[from] serde_json::Error),
    /// The response carried no usable assistant output.
    #[error("chat response was empty")]
    EmptyResponse,
    /// The assistant kept requesting tools past the round cap.
    #[error("tool loop exceeded {0} rounds without a final answer")]
    ToolRoundsExceeded(usize),
}
