//! Chat message model and the provider boundary.

use async_trait::async_trait;
use karmalens_tools::ToolSpec;
use serde_json::Value;

use crate::error::RunnerError;

/// Conversational role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

impl ChatRole {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Tool => "tool",
        }
    }
}

/// One entry in the conversation sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Who the entry is attributed to.
    pub role: ChatRole,
    /// Text content; empty for assistant tool-call entries.
    pub content: String,
    /// Tool invocations requested by an assistant entry.
    pub tool_calls: Vec<ToolInvocation>,
    /// Id of the invocation a tool entry answers.
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Plain system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(ChatRole::System, content)
    }

    /// Plain user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(ChatRole::User, content)
    }

    /// Plain assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(ChatRole::Assistant, content)
    }

    /// Assistant message echoing the tool calls it requested.
    pub fn assistant_tool_calls(calls: Vec<ToolInvocation>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: String::new(),
            tool_calls: calls,
            tool_call_id: None,
        }
    }

    /// Tool output answering one invocation.
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }

    fn plain(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

/// One tool call requested by the assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Call id echoed back in the matching tool message.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Arguments as parsed JSON.
    pub arguments: Value,
}

/// What the model produced in one round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatTurn {
    /// Final assistant text.
    Message(String),
    /// The assistant wants tool output before answering.
    ToolCalls(Vec<ToolInvocation>),
}

/// Token accounting reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Prompt-side tokens.
    pub input_tokens: u64,
    /// Completion-side tokens.
    pub output_tokens: u64,
}

/// One round trip's output plus its usage accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    /// The assistant's turn.
    pub turn: ChatTurn,
    /// Usage for this round, when the service reports it.
    pub usage: Option<TokenUsage>,
}

/// One-round-trip chat boundary; loop management belongs to the caller.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the conversation and tool declarations, get the next turn.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatOutcome, RunnerError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{ChatMessage, ChatRole, ToolInvocation};

    #[test]
    fn constructors_fill_roles_and_ids() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);

        let call = ToolInvocation {
            id: "call_1".to_string(),
            name: "fetch_hot_posts".to_string(),
            arguments: json!({ "subreddit": "rust" }),
        };
        let echo = ChatMessage::assistant_tool_calls(vec![call.clone()]);
        assert_eq!(echo.role, ChatRole::Assistant);
        assert_eq!(echo.content, "");
        assert_eq!(echo.tool_calls, vec![call]);

        let result = ChatMessage::tool_result("call_1", "output");
        assert_eq!(result.role, ChatRole::Tool);
        assert_eq!(result.tool_call_id.as_deref(), Some("call_1"));
    }
}
