//! Session-level error type.

use karmalens_runner::RunnerError;
use karmalens_tools::ToolProviderError;
use thiserror::Error;

/// Errors that terminate a session.
///
/// Memory store failures never appear here; the memory manager absorbs them
/// and the session continues with degraded context.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The tool server could not be started, reached, or stopped cleanly.
    #[error("tool server unavailable: {0}")]
    ToolProvider(#[from] ToolProviderError),
    /// The language model invocation failed.
    #[error("language model run failed: {0}")]
    Runner(#[from] RunnerError),
}
