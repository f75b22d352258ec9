//! Tool metadata and the dispatch boundary.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolProviderError;

/// Tool metadata for discovery and schema presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON schema for tool arguments.
    pub args_schema: Value,
}

/// Interface the runner uses to discover and invoke tools.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Tools available for this session.
    fn specs(&self) -> Vec<ToolSpec>;

    /// Invoke a named tool, returning its textual output.
    async fn call(&self, name: &str, args: Value) -> Result<String, ToolProviderError>;
}
