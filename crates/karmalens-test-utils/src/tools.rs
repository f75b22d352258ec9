use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use karmalens_tools::{ToolDispatcher, ToolProviderError, ToolSpec};
use parking_lot::Mutex;
use serde_json::Value;

/// Dispatcher over a fixed set of tools with canned outputs.
#[derive(Clone, Default)]
pub struct StaticToolset {
    specs: Vec<ToolSpec>,
    responses: HashMap<String, String>,
    pub calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl StaticToolset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.specs.push(ToolSpec {
            name: name.clone(),
            description: description.into(),
            args_schema: serde_json::json!({ "type": "object" }),
        });
        self.responses.insert(name, response.into());
        self
    }
}

#[async_trait]
impl ToolDispatcher for StaticToolset {
    fn specs(&self) -> Vec<ToolSpec> {
        self.specs.clone()
    }

    async fn call(&self, name: &str, args: Value) -> Result<String, ToolProviderError> {
        self.calls.lock().push((name.to_string(), args));
        self.responses
            .get(name)
            .cloned()
            .ok_or_else(|| ToolProviderError::Call(format!("unknown tool: {name}")))
    }
}
