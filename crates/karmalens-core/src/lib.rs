//! Session orchestration for memory-augmented Reddit analysis.
//!
//! A session walks five states in order: bootstrap the tool server, load
//! historical context from memory, compose the agent and task, execute the
//! agent run, and persist the insights it produced. Memory failures degrade
//! the session; tool-server and model failures abort it.

mod compose;
mod context;
mod error;
mod insights;
mod session;

pub use compose::{ANALYST_GOAL, ANALYST_ROLE, analysis_task, analyst, fetch_task, fetcher};
pub use context::{
    AnalysisContext, HISTORY_BACKSTORY_LIMIT, RELEVANT_TASK_LIMIT, SEARCH_LIMIT,
};
pub use error::SessionError;
pub use insights::{HIGH_ENGAGEMENT_MARKER, mentions_high_engagement, persist_insights};
pub use session::{DEFAULT_TOPIC_QUERY, SessionOrchestrator, SessionReport};
