//! Agent and task specifications plus the run result.

use crate::chat::TokenUsage;

/// Identity and framing for one agent run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    /// Short role title.
    pub role: String,
    /// What the agent optimizes for.
    pub goal: String,
    /// Persona text, including any accumulated history block.
    pub backstory: String,
}

impl AgentSpec {
    /// Render the system prompt for this agent.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {role}.\n\n{backstory}\n\nYour goal: {goal}",
            role = self.role,
            backstory = self.backstory,
            goal = self.goal
        )
    }
}

/// One unit of work handed to the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    /// Full task instructions.
    pub description: String,
    /// Contract for the shape of the answer.
    pub expected_output: String,
}

impl TaskSpec {
    /// Render the user message for this task.
    pub fn user_prompt(&self) -> String {
        format!(
            "{description}\n\nExpected output:\n{expected}",
            description = self.description,
            expected = self.expected_output
        )
    }
}

/// Final output of one agent run.
///
/// Produced once, consumed by insight extraction, then discarded; the
/// runner keeps no copy.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    /// Raw text of the final assistant message.
    pub raw: String,
    /// Token usage summed across rounds, when reported.
    pub usage: Option<TokenUsage>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{AgentSpec, TaskSpec};

    #[test]
    fn system_prompt_carries_role_backstory_and_goal() {
        let agent = AgentSpec {
            role: "Reddit Post Analyst with Memory".to_string(),
            goal: "Analyze engagement".to_string(),
            backstory: "You remember prior sessions.".to_string(),
        };

        let prompt = agent.system_prompt();
        assert!(prompt.starts_with("You are Reddit Post Analyst with Memory."));
        assert!(prompt.contains("You remember prior sessions."));
        assert!(prompt.ends_with("Your goal: Analyze engagement"));
    }

    #[test]
    fn user_prompt_appends_expected_output() {
        let task = TaskSpec {
            description: "Fetch posts.".to_string(),
            expected_output: "A numbered list.".to_string(),
        };

        assert_eq!(
            task.user_prompt(),
            "Fetch posts.\n\nExpected output:\nA numbered list."
        );
    }
}
