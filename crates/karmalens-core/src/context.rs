//! Historical context loaded from memory before composing the agent.

use karmalens_memory::{MemoryManager, MemoryRecord};

/// How many records from the full history feed the agent backstory.
pub const HISTORY_BACKSTORY_LIMIT: usize = 5;
/// How many search hits feed the task description.
pub const RELEVANT_TASK_LIMIT: usize = 3;
/// How many candidates to pull from search before trimming to the task limit.
pub const SEARCH_LIMIT: usize = 10;

const HISTORY_HEADER: &str = "HISTORICAL INSIGHTS FROM PREVIOUS ANALYSES:";
const RELEVANT_HEADER: &str = "RELEVANT HISTORICAL INSIGHTS:";
const EMPTY_HISTORY_NOTE: &str = "No prior analysis history - starting fresh.";
const EMPTY_RELEVANT_NOTE: &str = "No relevant historical insights for this topic.";

/// Records loaded for one session, split by how they are used.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    /// Everything stored for the scope; the backstory uses the first few.
    pub history: Vec<MemoryRecord>,
    /// Topic-relevant records, most relevant first; the task uses the top ones.
    pub relevant: Vec<MemoryRecord>,
}

impl AnalysisContext {
    /// Pull the scope's history and the topic-relevant records.
    ///
    /// Store failures degrade to empty lists inside the manager, so loading
    /// never fails; an unreachable store means an empty context.
    pub async fn load(manager: &MemoryManager, topic_query: &str) -> Self {
        let history = manager.list_all().await;
        let relevant = manager.search(topic_query, SEARCH_LIMIT).await;
        Self { history, relevant }
    }

    /// Prior-insight block for the agent backstory.
    pub fn history_block(&self) -> String {
        render_block(
            &self.history,
            HISTORY_BACKSTORY_LIMIT,
            HISTORY_HEADER,
            EMPTY_HISTORY_NOTE,
        )
    }

    /// Topic-relevant block for the task description.
    pub fn relevant_block(&self) -> String {
        render_block(
            &self.relevant,
            RELEVANT_TASK_LIMIT,
            RELEVANT_HEADER,
            EMPTY_RELEVANT_NOTE,
        )
    }
}

fn render_block(records: &[MemoryRecord], limit: usize, header: &str, empty_note: &str) -> String {
    if records.is_empty() {
        return empty_note.to_string();
    }
    let mut block = String::from(header);
    for record in records.iter().take(limit) {
        block.push_str("\n- ");
        block.push_str(&record.text);
    }
    block
}

#[cfg(test)]
mod tests {
    use karmalens_memory::MemoryRecord;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::{AnalysisContext, HISTORY_BACKSTORY_LIMIT};

    fn record(text: &str) -> MemoryRecord {
        MemoryRecord {
            id: String::new(),
            text: text.to_string(),
            metadata: Value::Null,
            owner_scope: "reddit_analyst_spez".to_string(),
            created_at: None,
            score: None,
        }
    }

    #[test]
    fn empty_context_renders_placeholders() {
        let context = AnalysisContext::default();
        assert_eq!(
            context.history_block(),
            "No prior analysis history - starting fresh."
        );
        assert_eq!(
            context.relevant_block(),
            "No relevant historical insights for this topic."
        );
    }

    #[test]
    fn history_block_lists_records_under_header() {
        let context = AnalysisContext {
            history: vec![record("weekend posts do better"), record("short titles win")],
            relevant: Vec::new(),
        };
        assert_eq!(
            context.history_block(),
            "HISTORICAL INSIGHTS FROM PREVIOUS ANALYSES:\n\
             - weekend posts do better\n\
             - short titles win"
        );
    }

    #[test]
    fn history_block_caps_at_backstory_limit() {
        let context = AnalysisContext {
            history: (0..HISTORY_BACKSTORY_LIMIT + 3)
                .map(|n| record(&format!("insight {n}")))
                .collect(),
            relevant: Vec::new(),
        };
        let block = context.history_block();
        assert_eq!(block.matches("- insight").count(), HISTORY_BACKSTORY_LIMIT);
        assert!(!block.contains(&format!("insight {HISTORY_BACKSTORY_LIMIT}")));
    }

    #[test]
    fn relevant_block_keeps_top_three() {
        let context = AnalysisContext {
            history: Vec::new(),
            relevant: vec![
                record("first"),
                record("second"),
                record("third"),
                record("fourth"),
            ],
        };
        let block = context.relevant_block();
        assert!(block.starts_with("RELEVANT HISTORICAL INSIGHTS:"));
        assert!(block.contains("- third"));
        assert!(!block.contains("- fourth"));
    }
}
