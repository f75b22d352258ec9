use std::sync::Arc;

use async_trait::async_trait;
use karmalens_runner::{ChatMessage, ChatOutcome, ChatProvider, ChatTurn, RunnerError};
use karmalens_tools::ToolSpec;
use parking_lot::Mutex;

/// Provider that always answers with the same final text.
#[derive(Debug, Clone)]
pub struct FixedChat {
    response: String,
}

impl FixedChat {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FixedChat {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ChatOutcome, RunnerError> {
        Ok(ChatOutcome {
            turn: ChatTurn::Message(self.response.clone()),
            usage: None,
        })
    }
}

/// Provider that answers with fixed text and keeps the last conversation
/// it was sent, so tests can assert on composed prompts.
#[derive(Debug, Clone)]
pub struct RecordingChat {
    response: String,
    pub last_messages: Arc<Mutex<Vec<ChatMessage>>>,
    pub seen_tools: Arc<Mutex<Vec<String>>>,
}

impl RecordingChat {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            last_messages: Arc::new(Mutex::new(Vec::new())),
            seen_tools: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatOutcome, RunnerError> {
        *self.last_messages.lock() = messages.to_vec();
        *self.seen_tools.lock() = tools.iter().map(|tool| tool.name.clone()).collect();
        Ok(ChatOutcome {
            turn: ChatTurn::Message(self.response.clone()),
            usage: None,
        })
    }
}

/// Provider where every invocation fails with a service error.
#[derive(Debug, Clone)]
pub struct FailingChat {
    message: String,
}

impl FailingChat {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for FailingChat {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ChatOutcome, RunnerError> {
        Err(RunnerError::Api {
            status: 503,
            message: self.message.clone(),
        })
    }
}
