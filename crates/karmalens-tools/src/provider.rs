//! MCP subprocess tool provider.

use async_trait::async_trait;
use karmalens_config::RedditSettings;
use log::{debug, info};
use rmcp::ServiceExt;
use rmcp::model::{CallToolRequestParams, CallToolResult, Tool};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::TokioChildProcess;
use serde_json::{Map, Value};
use tokio::process::Command;

use crate::dispatch::{ToolDispatcher, ToolSpec};
use crate::error::ToolProviderError;

/// Launch parameters for a tool server subprocess.
///
/// Credentials travel in the environment map, never on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerParams {
    /// Executable to spawn.
    pub command: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Environment variables injected into the subprocess.
    pub env: Vec<(String, String)>,
}

impl ServerParams {
    /// Parameters for the Reddit MCP server.
    pub fn reddit(settings: &RedditSettings) -> Self {
        let mut parts = settings.server_command.iter();
        let command = parts.next().cloned().unwrap_or_else(|| "uvx".to_string());
        Self {
            command,
            args: parts.cloned().collect(),
            env: vec![
                ("REDDIT_CLIENT_ID".to_string(), settings.client_id.clone()),
                (
                    "REDDIT_CLIENT_SECRET".to_string(),
                    settings.client_secret.clone(),
                ),
                ("REDDIT_USERNAME".to_string(), settings.username.clone()),
                (
                    "REDDIT_REFRESH_TOKEN".to_string(),
                    settings.refresh_token.clone(),
                ),
                ("REDDIT_USER_AGENT".to_string(), settings.user_agent.clone()),
            ],
        }
    }
}

/// Tool provider backed by an MCP server subprocess.
///
/// The connection is a scoped resource: acquire with [`McpToolProvider::connect`],
/// release with [`McpToolProvider::shutdown`]. Dropping the provider also
/// reaps the subprocess through the transport.
#[derive(Debug)]
pub struct McpToolProvider {
    service: RunningService<RoleClient, ()>,
    specs: Vec<ToolSpec>,
}

impl McpToolProvider {
    /// Spawn the server, perform the handshake, and discover its tools.
    pub async fn connect(params: &ServerParams) -> Result<Self, ToolProviderError> {
        info!("launching tool server (command={})", params.command);
        let mut command = Command::new(&params.command);
        command.args(&params.args);
        for (name, value) in &params.env {
            command.env(name, value);
        }
        let transport = TokioChildProcess::new(command)?;
        let service = ()
            .serve(transport)
            .await
            .map_err(|err| ToolProviderError::Handshake(err.to_string()))?;
        let tools = service
            .list_all_tools()
            .await
            .map_err(|err| ToolProviderError::Handshake(err.to_string()))?;
        let specs: Vec<ToolSpec> = tools.iter().map(tool_spec).collect();
        info!(
            "tool server ready (tools={})",
            specs
                .iter()
                .map(|spec| spec.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self { service, specs })
    }

    /// Release the connection and reap the subprocess.
    pub async fn shutdown(self) -> Result<(), ToolProviderError> {
        match self.service.cancel().await {
            Ok(reason) => {
                debug!("tool server stopped (reason={reason:?})");
                Ok(())
            }
            Err(err) => Err(ToolProviderError::Shutdown(err.to_string())),
        }
    }
}

#[async_trait]
impl ToolDispatcher for McpToolProvider {
    fn specs(&self) -> Vec<ToolSpec> {
        self.specs.clone()
    }

    async fn call(&self, name: &str, args: Value) -> Result<String, ToolProviderError> {
        let arguments = tool_arguments(args)?;
        debug!("calling tool (name={name})");
        let result = self
            .service
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_string().into(),
                arguments,
                task: None,
            })
            .await
            .map_err(|err| ToolProviderError::Call(err.to_string()))?;
        Ok(render_tool_result(&result))
    }
}

fn tool_spec(tool: &Tool) -> ToolSpec {
    ToolSpec {
        name: tool.name.to_string(),
        description: tool
            .description
            .as_ref()
            .map(|description| description.to_string())
            .unwrap_or_default(),
        args_schema: Value::Object(tool.input_schema.as_ref().clone()),
    }
}

/// Tool arguments go over the wire as a JSON object or nothing at all.
fn tool_arguments(args: Value) -> Result<Option<Map<String, Value>>, ToolProviderError> {
    match args {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(ToolProviderError::Call(format!(
            "tool arguments must be a JSON object, got {other}"
        ))),
    }
}

/// Flatten a tool result into text for the model, reading the serialized
/// form of the result.
fn render_tool_result(result: &CallToolResult) -> String {
    let Ok(value) = serde_json::to_value(result) else {
        return String::new();
    };
    let mut parts = Vec::new();
    if let Some(items) = value.get("content").and_then(Value::as_array) {
        for item in items {
            if let Some(text) = item.get("text").and_then(Value::as_str) {
                parts.push(text.to_string());
            }
        }
    }
    if parts.is_empty()
        && let Some(structured) = value.get("structuredContent")
    {
        parts.push(structured.to_string());
    }
    let is_error = value
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let text = parts.join("\n");
    if is_error {
        format!("tool reported an error: {text}")
    } else {
        text
    }
}
