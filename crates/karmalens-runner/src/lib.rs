//! Language model runner: chat wire boundary, HTTP client, and the agent loop.

mod agent;
mod chat;
mod client;
mod error;
mod executor;

pub use agent::{AgentSpec, SessionResult, TaskSpec};
pub use chat::{ChatMessage, ChatOutcome, ChatProvider, ChatRole, ChatTurn, TokenUsage, ToolInvocation};
pub use client::OpenAiChatClient;
pub use error::RunnerError;
pub use executor::AgentRunner;
