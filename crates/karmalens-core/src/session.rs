//! The session state machine: bootstrap, context load, compose, execute,
//! persist.

use karmalens_memory::MemoryManager;
use karmalens_runner::{AgentRunner, SessionResult};
use karmalens_tools::{McpToolProvider, ServerParams, ToolDispatcher};
use log::{info, warn};

use crate::compose;
use crate::context::AnalysisContext;
use crate::error::SessionError;
use crate::insights;

/// Topic used for task-level memory lookup unless overridden.
pub const DEFAULT_TOPIC_QUERY: &str = "reddit engagement patterns topic";

/// What one completed session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    /// Final output of the agent run.
    pub result: SessionResult,
    /// Records loaded into the backstory context.
    pub history_records: usize,
    /// Records loaded into the task context.
    pub relevant_records: usize,
    /// New records written during persistence.
    pub persisted_records: usize,
}

/// Runs analysis sessions over injected memory and runner components.
///
/// One orchestrator serves one user scope; sessions run one at a time.
pub struct SessionOrchestrator {
    manager: MemoryManager,
    runner: AgentRunner,
    username: String,
    topic_query: String,
}

impl SessionOrchestrator {
    /// Build an orchestrator for the given user.
    pub fn new(manager: MemoryManager, runner: AgentRunner, username: impl Into<String>) -> Self {
        Self {
            manager,
            runner,
            username: username.into(),
            topic_query: DEFAULT_TOPIC_QUERY.to_string(),
        }
    }

    /// Override the topic used for task-level memory lookup.
    pub fn with_topic_query(mut self, topic_query: impl Into<String>) -> Self {
        self.topic_query = topic_query.into();
        self
    }

    /// Run one full session against a tool server spawned from `params`.
    ///
    /// The tool connection is released on every exit path, including when
    /// the session body fails.
    pub async fn run(&self, params: &ServerParams) -> Result<SessionReport, SessionError> {
        let provider = McpToolProvider::connect(params).await?;
        let outcome = self.run_with_tools(&provider).await;
        if let Err(err) = provider.shutdown().await {
            warn!("tool server shutdown failed: {err}");
        }
        outcome
    }

    /// The session body, from context load through persistence.
    pub async fn run_with_tools(
        &self,
        tools: &dyn ToolDispatcher,
    ) -> Result<SessionReport, SessionError> {
        let context = AnalysisContext::load(&self.manager, &self.topic_query).await;
        info!(
            "context loaded (scope={}, history={}, relevant={})",
            self.manager.scope(),
            context.history.len(),
            context.relevant.len()
        );

        let agent = compose::analyst(&context.history_block());
        let task = compose::analysis_task(&self.username, &context.relevant_block());

        let result = self.runner.run(&agent, &task, tools).await?;

        let persisted = insights::persist_insights(&self.manager, &result.raw).await;
        info!(
            "session complete (result_chars={}, persisted_records={})",
            result.raw.len(),
            persisted
        );

        Ok(SessionReport {
            result,
            history_records: context.history.len(),
            relevant_records: context.relevant.len(),
            persisted_records: persisted,
        })
    }
}
