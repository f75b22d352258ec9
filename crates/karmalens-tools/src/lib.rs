//! Tool provider boundary: dispatch types and the MCP subprocess client.

mod dispatch;
mod error;
mod provider;

pub use dispatch::{ToolDispatcher, ToolSpec};
pub use error::ToolProviderError;
pub use provider::{McpToolProvider, ServerParams};
