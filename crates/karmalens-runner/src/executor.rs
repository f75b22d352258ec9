//! Bounded agent loop: chat rounds interleaved with tool dispatch.

use std::sync::Arc;

use karmalens_tools::ToolDispatcher;
use log::{debug, info, warn};

use crate::agent::{AgentSpec, SessionResult, TaskSpec};
use crate::chat::{ChatMessage, ChatProvider, ChatTurn, TokenUsage};
use crate::error::RunnerError;

const MAX_TOOL_LOG_CHARS: usize = 2000;

/// Drives an agent run to completion against a chat provider.
///
/// Tool failures are reported back to the model as tool output so it can
/// recover; only transport and service errors abort the run.
pub struct AgentRunner {
    chat: Arc<dyn ChatProvider>,
    max_tool_rounds: usize,
}

impl AgentRunner {
    /// Build a runner. A round cap of zero is raised to one.
    pub fn new(chat: Arc<dyn ChatProvider>, max_tool_rounds: usize) -> Self {
        Self {
            chat,
            max_tool_rounds: max_tool_rounds.max(1),
        }
    }

    /// Run the agent on one task until it produces a final answer.
    pub async fn run(
        &self,
        agent: &AgentSpec,
        task: &TaskSpec,
        tools: &dyn ToolDispatcher,
    ) -> Result<SessionResult, RunnerError> {
        let specs = tools.specs();
        let mut messages = vec![
            ChatMessage::system(agent.system_prompt()),
            ChatMessage::user(task.user_prompt()),
        ];
        let mut usage: Option<TokenUsage> = None;

        info!(
            "starting agent run (role={}, tools={})",
            agent.role,
            specs.len()
        );

        for round in 0..self.max_tool_rounds {
            let outcome = self.chat.chat(&messages, &specs).await?;
            usage = merge_usage(usage, outcome.usage);

            match outcome.turn {
                ChatTurn::Message(raw) => {
                    info!(
                        "agent run complete (rounds={}, chars={})",
                        round + 1,
                        raw.len()
                    );
                    return Ok(SessionResult { raw, usage });
                }
                ChatTurn::ToolCalls(calls) => {
                    debug!(
                        "round {} requested {} tool call(s)",
                        round + 1,
                        calls.len()
                    );
                    messages.push(ChatMessage::assistant_tool_calls(calls.clone()));
                    for call in calls {
                        let output = match tools.call(&call.name, call.arguments).await {
                            Ok(output) => output,
                            Err(err) => {
                                warn!("tool call failed (tool={}): {err}", call.name);
                                format!("tool error: {err}")
                            }
                        };
                        debug!(
                            "tool {} returned: {}",
                            call.name,
                            summarize(&output, MAX_TOOL_LOG_CHARS)
                        );
                        messages.push(ChatMessage::tool_result(call.id, output));
                    }
                }
            }
        }

        Err(RunnerError::ToolRoundsExceeded(self.max_tool_rounds))
    }
}

fn merge_usage(total: Option<TokenUsage>, round: Option<TokenUsage>) -> Option<TokenUsage> {
    match (total, round) {
        (Some(total), Some(round)) => Some(TokenUsage {
            input_tokens: total.input_tokens + round.input_tokens,
            output_tokens: total.output_tokens + round.output_tokens,
        }),
        (Some(total), None) => Some(total),
        (None, round) => round,
    }
}

/// Truncate tool output to a max character count for the debug log.
fn summarize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use karmalens_tools::{ToolDispatcher, ToolProviderError, ToolSpec};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::{AgentRunner, merge_usage, summarize};
    use crate::agent::{AgentSpec, TaskSpec};
    use crate::chat::{
        ChatMessage, ChatOutcome, ChatProvider, ChatRole, ChatTurn, TokenUsage, ToolInvocation,
    };
    use crate::error::RunnerError;

    struct ScriptedChat {
        turns: Mutex<VecDeque<Result<ChatOutcome, RunnerError>>>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedChat {
        fn new(turns: Vec<Result<ChatOutcome, RunnerError>>) -> Arc<Self> {
            Arc::new(Self {
                turns: Mutex::new(turns.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn conversations(&self) -> Vec<Vec<ChatMessage>> {
            self.seen.lock().expect("lock conversations").clone()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedChat {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            _tools: &[ToolSpec],
        ) -> Result<ChatOutcome, RunnerError> {
            self.seen
                .lock()
                .expect("lock conversations")
                .push(messages.to_vec());
            self.turns
                .lock()
                .expect("lock script")
                .pop_front()
                .expect("script exhausted")
        }
    }

    struct RecordingToolset {
        output: Result<String, String>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl RecordingToolset {
        fn returning(output: &str) -> Self {
            Self {
                output: Ok(output.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                output: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().expect("lock calls").clone()
        }
    }

    #[async_trait]
    impl ToolDispatcher for RecordingToolset {
        fn specs(&self) -> Vec<ToolSpec> {
            vec![ToolSpec {
                name: "fetch_hot_posts".to_string(),
                description: "Fetch hot posts".to_string(),
                args_schema: json!({ "type": "object" }),
            }]
        }

        async fn call(&self, name: &str, args: Value) -> Result<String, ToolProviderError> {
            self.calls
                .lock()
                .expect("lock calls")
                .push((name.to_string(), args));
            self.output
                .clone()
                .map_err(ToolProviderError::Call)
        }
    }

    fn agent() -> AgentSpec {
        AgentSpec {
            role: "Reddit Post Analyst with Memory".to_string(),
            goal: "Analyze engagement".to_string(),
            backstory: "You remember prior sessions.".to_string(),
        }
    }

    fn task() -> TaskSpec {
        TaskSpec {
            description: "Analyze the latest post.".to_string(),
            expected_output: "A structured analysis.".to_string(),
        }
    }

    fn message_outcome(text: &str) -> Result<ChatOutcome, RunnerError> {
        Ok(ChatOutcome {
            turn: ChatTurn::Message(text.to_string()),
            usage: None,
        })
    }

    fn tool_call_outcome() -> Result<ChatOutcome, RunnerError> {
        Ok(ChatOutcome {
            turn: ChatTurn::ToolCalls(vec![ToolInvocation {
                id: "call_1".to_string(),
                name: "fetch_hot_posts".to_string(),
                arguments: json!({ "subreddit": "python" }),
            }]),
            usage: None,
        })
    }

    #[tokio::test]
    async fn returns_final_text_without_touching_tools() {
        let chat = ScriptedChat::new(vec![message_outcome("analysis complete")]);
        let toolset = RecordingToolset::returning("unused");
        let runner = AgentRunner::new(chat.clone(), 4);

        let result = runner
            .run(&agent(), &task(), &toolset)
            .await
            .expect("run succeeds");

        assert_eq!(result.raw, "analysis complete");
        assert_eq!(toolset.calls(), Vec::new());

        let conversations = chat.conversations();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0][0].role, ChatRole::System);
        assert_eq!(conversations[0][0].content, agent().system_prompt());
        assert_eq!(conversations[0][1].content, task().user_prompt());
    }

    #[tokio::test]
    async fn feeds_tool_output_back_to_the_model() {
        let chat = ScriptedChat::new(vec![tool_call_outcome(), message_outcome("3 hot posts")]);
        let toolset = RecordingToolset::returning("post list");
        let runner = AgentRunner::new(chat.clone(), 4);

        let result = runner
            .run(&agent(), &task(), &toolset)
            .await
            .expect("run succeeds");

        assert_eq!(result.raw, "3 hot posts");
        assert_eq!(
            toolset.calls(),
            vec![(
                "fetch_hot_posts".to_string(),
                json!({ "subreddit": "python" })
            )]
        );

        let conversations = chat.conversations();
        assert_eq!(conversations.len(), 2);
        let second = &conversations[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].role, ChatRole::Assistant);
        assert_eq!(second[2].tool_calls.len(), 1);
        assert_eq!(second[3].role, ChatRole::Tool);
        assert_eq!(second[3].content, "post list");
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn reports_tool_failure_as_tool_output() {
        let chat = ScriptedChat::new(vec![tool_call_outcome(), message_outcome("recovered")]);
        let toolset = RecordingToolset::failing("rate limited");
        let runner = AgentRunner::new(chat.clone(), 4);

        let result = runner
            .run(&agent(), &task(), &toolset)
            .await
            .expect("run succeeds");

        assert_eq!(result.raw, "recovered");
        let conversations = chat.conversations();
        let tool_message = &conversations[1][3];
        assert_eq!(tool_message.role, ChatRole::Tool);
        assert!(tool_message.content.starts_with("tool error:"));
        assert!(tool_message.content.contains("rate limited"));
    }

    #[tokio::test]
    async fn stops_after_the_round_cap() {
        let chat = ScriptedChat::new(vec![tool_call_outcome(), tool_call_outcome()]);
        let toolset = RecordingToolset::returning("post list");
        let runner = AgentRunner::new(chat, 2);

        match runner.run(&agent(), &task(), &toolset).await {
            Err(RunnerError::ToolRoundsExceeded(2)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(toolset.calls().len(), 2);
    }

    #[tokio::test]
    async fn propagates_chat_failure() {
        let chat = ScriptedChat::new(vec![Err(RunnerError::Api {
            status: 503,
            message: "overloaded".to_string(),
        })]);
        let toolset = RecordingToolset::returning("unused");
        let runner = AgentRunner::new(chat, 4);

        match runner.run(&agent(), &task(), &toolset).await {
            Err(RunnerError::Api { status: 503, .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sums_usage_across_rounds() {
        let first = Ok(ChatOutcome {
            turn: ChatTurn::ToolCalls(vec![ToolInvocation {
                id: "call_1".to_string(),
                name: "fetch_hot_posts".to_string(),
                arguments: json!({}),
            }]),
            usage: Some(TokenUsage {
                input_tokens: 100,
                output_tokens: 20,
            }),
        });
        let second = Ok(ChatOutcome {
            turn: ChatTurn::Message("done".to_string()),
            usage: Some(TokenUsage {
                input_tokens: 150,
                output_tokens: 30,
            }),
        });
        let chat = ScriptedChat::new(vec![first, second]);
        let toolset = RecordingToolset::returning("post list");
        let runner = AgentRunner::new(chat, 4);

        let result = runner
            .run(&agent(), &task(), &toolset)
            .await
            .expect("run succeeds");

        assert_eq!(
            result.usage,
            Some(TokenUsage {
                input_tokens: 250,
                output_tokens: 50,
            })
        );
    }

    #[tokio::test]
    async fn zero_round_cap_still_allows_one_round() {
        let chat = ScriptedChat::new(vec![message_outcome("done")]);
        let toolset = RecordingToolset::returning("unused");
        let runner = AgentRunner::new(chat, 0);

        let result = runner
            .run(&agent(), &task(), &toolset)
            .await
            .expect("run succeeds");
        assert_eq!(result.raw, "done");
    }

    #[test]
    fn usage_merge_keeps_partial_reports() {
        let usage = TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        };
        assert_eq!(merge_usage(None, None), None);
        assert_eq!(merge_usage(Some(usage), None), Some(usage));
        assert_eq!(merge_usage(None, Some(usage)), Some(usage));
    }

    #[test]
    fn summarize_truncates_long_output() {
        assert_eq!(summarize("short", 10), "short");
        assert_eq!(summarize("abcdefghij", 4), "abcd…");
    }
}
