//! HTTP client for OpenAI-compatible chat completions.
//!
//! All wire types are private to this module; callers work with
//! [`ChatMessage`] and [`ChatTurn`].

use async_trait::async_trait;
use karmalens_tools::ToolSpec;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{
    ChatMessage, ChatOutcome, ChatProvider, ChatTurn, TokenUsage, ToolInvocation,
};
use crate::error::RunnerError;

/// Adapter for any HTTP endpoint implementing `/chat/completions`.
///
/// Cheap to clone; `reqwest::Client` is shared internally.
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    drop_params: Vec<String>,
}

impl OpenAiChatClient {
    /// Build a client for the given endpoint, key, and model.
    ///
    /// `drop_params` names request-body keys stripped before sending, for
    /// models that reject standard sampling options.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        drop_params: Vec<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            drop_params,
        }
    }

    /// Request a sampling temperature. Still subject to `drop_params`.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<Value, RunnerError> {
        let request = WireRequest {
            model: self.model.clone(),
            messages: messages.iter().map(wire_message).collect(),
            temperature: self.temperature,
            tools: tools.iter().map(wire_tool).collect(),
        };
        let mut body = serde_json::to_value(&request)?;
        apply_drop_params(&mut body, &self.drop_params);
        Ok(body)
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatOutcome, RunnerError> {
        let body = self.request_body(messages, tools)?;
        debug!(
            "sending chat request (model={}, messages={}, tools={})",
            self.model,
            messages.len(),
            tools.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: WireResponse = response.json().await?;

        debug!("received chat response (choices={})", parsed.choices.len());
        let usage = parsed.usage.map(|usage| TokenUsage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        });
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(RunnerError::EmptyResponse)?;
        let turn = decode_choice(choice.message)?;
        Ok(ChatOutcome { turn, usage })
    }
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RunnerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    let message = rejection_message(&body);
    error!("chat request rejected (status={status}): {message}");
    Err(RunnerError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pull the service's error message out of its envelope when it has one.
fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.code {
            Some(code) => format!("{} [code={code}]", envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body.to_string(),
    }
}

fn decode_choice(message: WireChoiceMessage) -> Result<ChatTurn, RunnerError> {
    if let Some(calls) = message.tool_calls
        && !calls.is_empty()
    {
        return Ok(ChatTurn::ToolCalls(
            calls.into_iter().map(domain_invocation).collect(),
        ));
    }
    let text = message
        .content
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(RunnerError::EmptyResponse)?;
    Ok(ChatTurn::Message(text))
}

fn domain_invocation(call: WireToolCall) -> ToolInvocation {
    let arguments = serde_json::from_str(&call.function.arguments)
        .unwrap_or_else(|_| Value::String(call.function.arguments.clone()));
    ToolInvocation {
        id: call.id,
        name: call.function.name,
        arguments,
    }
}

fn wire_message(message: &ChatMessage) -> WireMessage {
    let content = if message.content.is_empty() && !message.tool_calls.is_empty() {
        None
    } else {
        Some(message.content.clone())
    };
    let tool_calls = if message.tool_calls.is_empty() {
        None
    } else {
        Some(message.tool_calls.iter().map(wire_tool_call).collect())
    };
    WireMessage {
        role: message.role.as_str(),
        content,
        tool_calls,
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn wire_tool_call(invocation: &ToolInvocation) -> WireToolCall {
    WireToolCall {
        id: invocation.id.clone(),
        call_type: "function".to_string(),
        function: WireFunctionCall {
            name: invocation.name.clone(),
            arguments: invocation.arguments.to_string(),
        },
    }
}

fn wire_tool(spec: &ToolSpec) -> WireTool {
    WireTool {
        tool_type: "function",
        function: WireToolDef {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: spec.args_schema.clone(),
        },
    }
}

fn apply_drop_params(body: &mut Value, drop_params: &[String]) {
    if let Value::Object(map) = body {
        for name in drop_params {
            map.remove(name);
        }
    }
}

// Private wire types.

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON text, per the wire contract.
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: WireToolDef,
}

#[derive(Debug, Serialize)]
struct WireToolDef {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct WireChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

// Error envelope used by the service and its compatible alternatives.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<Value>,
}
