//! Record and message models matching the memory store's wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One immutable record in the memory store.
///
/// Records are append-only: the manager never rewrites an existing record,
/// it only adds new ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Record text.
    #[serde(rename = "memory")]
    pub text: String,
    /// Metadata attached at write time.
    #[serde(default)]
    pub metadata: Value,
    /// Scope the record belongs to.
    #[serde(rename = "user_id", default)]
    pub owner_scope: String,
    /// Server-side creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Relevance score; present on search results only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// One message element of an add request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryMessage {
    /// Conversational role the text is attributed to.
    pub role: String,
    /// Text the store distills into a record.
    pub content: String,
}

impl MemoryMessage {
    /// Message attributed to the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Message attributed to the assistant.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Post fields captured in a stored per-post analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSnapshot {
    /// Post title.
    pub title: String,
    /// Subreddit the post appeared in.
    pub subreddit: String,
    /// Submission time as reported by the tool server.
    pub posted_at: String,
}

/// Engagement counters for one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementMetrics {
    /// Net upvotes at capture time.
    pub upvotes: i64,
    /// Comment count at capture time.
    pub comments: i64,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{MemoryMessage, MemoryRecord};

    #[test]
    fn record_deserializes_from_store_fields() {
        let record: MemoryRecord = serde_json::from_value(json!({
            "id": "rec-1",
            "memory": "Pattern: tech posts get more upvotes on weekends",
            "user_id": "reddit_analyst_spez",
            "metadata": { "type": "engagement_pattern" },
            "created_at": "2026-08-01T12:00:00Z",
            "score": 0.87,
        }))
        .expect("record");

        assert_eq!(record.id, "rec-1");
        assert_eq!(
            record.text,
            "Pattern: tech posts get more upvotes on weekends"
        );
        assert_eq!(record.owner_scope, "reddit_analyst_spez");
        assert_eq!(record.metadata["type"], json!("engagement_pattern"));
        assert_eq!(record.score, Some(0.87));
    }

    #[test]
    fn record_tolerates_sparse_responses() {
        let record: MemoryRecord =
            serde_json::from_value(json!({ "memory": "bare" })).expect("record");

        assert_eq!(record.id, "");
        assert_eq!(record.text, "bare");
        assert_eq!(record.metadata, serde_json::Value::Null);
        assert_eq!(record.created_at, None);
        assert_eq!(record.score, None);
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(MemoryMessage::user("a").role, "user");
        assert_eq!(MemoryMessage::assistant("b").role, "assistant");
    }
}
