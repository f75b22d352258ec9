//! Best-effort, scope-bound session memory.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use serde_json::{Value, json};

use crate::model::{EngagementMetrics, MemoryMessage, MemoryRecord, PostSnapshot};
use crate::scope::UserScope;
use crate::store::MemoryStore;

/// Mediates all memory store access for one user scope.
///
/// Every operation degrades instead of failing: a store outage is logged
/// and turns reads into empty results and writes into skipped writes, so
/// the surrounding analysis keeps running without history.
pub struct MemoryManager {
    store: Arc<dyn MemoryStore>,
    scope: UserScope,
}

impl MemoryManager {
    /// Bind a store to one user scope.
    pub fn new(store: Arc<dyn MemoryStore>, scope: UserScope) -> Self {
        Self { store, scope }
    }

    /// Scope this manager reads and writes under.
    pub fn scope(&self) -> &UserScope {
        &self.scope
    }

    /// Append one record tagged with `kind`. Returns whether the write
    /// actually happened.
    pub async fn store(&self, message: MemoryMessage, kind: &str, extra: Value) -> bool {
        let metadata = tag_metadata(kind, extra);
        match self.store.add(&self.scope, &[message], metadata).await {
            Ok(()) => {
                debug!("memory stored (scope={}, kind={})", self.scope, kind);
                true
            }
            Err(err) => {
                warn!(
                    "memory write skipped (scope={}, kind={}): {}",
                    self.scope, kind, err
                );
                false
            }
        }
    }

    /// Store the raw output of one analysis session.
    pub async fn store_analysis_result(&self, text: &str) -> bool {
        let extra = json!({
            "analysis_type": "reddit_engagement_analysis",
            "timestamp": Utc::now().to_rfc3339(),
        });
        self.store(MemoryMessage::assistant(text), "analysis_result", extra)
            .await
    }

    /// Store a structured per-post analysis entry.
    pub async fn store_post_analysis(
        &self,
        post: &PostSnapshot,
        metrics: &EngagementMetrics,
        insights: &str,
    ) -> bool {
        let text = format!(
            "Reddit Post Analysis:\n\
             Title: {}\n\
             Subreddit: {}\n\
             Upvotes: {}\n\
             Comments: {}\n\
             Key Insights: {}\n\
             Posted on: {}",
            post.title, post.subreddit, metrics.upvotes, metrics.comments, insights, post.posted_at
        );
        let extra = json!({ "timestamp": Utc::now().to_rfc3339() });
        self.store(MemoryMessage::user(text), "post_analysis", extra)
            .await
    }

    /// Store a discovered engagement pattern.
    pub async fn store_engagement_pattern(&self, pattern_type: &str, details: &str) -> bool {
        let text = format!(
            "Engagement Pattern Discovered:\n\
             Pattern Type: {}\n\
             Details: {}\n\
             Discovery Date: {}",
            pattern_type,
            details,
            Utc::now().format("%Y-%m-%d")
        );
        let extra = json!({ "pattern_type": pattern_type });
        self.store(MemoryMessage::user(text), "engagement_pattern", extra)
            .await
    }

    /// Relevance-ranked lookup within the scope; empty on store failure.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<MemoryRecord> {
        match self.store.search(&self.scope, query, limit).await {
            Ok(records) => {
                debug!(
                    "memory search (scope={}, limit={}, returned={})",
                    self.scope,
                    limit,
                    records.len()
                );
                records
            }
            Err(err) => {
                warn!("memory search failed (scope={}): {}", self.scope, err);
                Vec::new()
            }
        }
    }

    /// Every record under the scope; empty on store failure.
    pub async fn list_all(&self) -> Vec<MemoryRecord> {
        match self.store.get_all(&self.scope).await {
            Ok(records) => {
                debug!(
                    "memory list (scope={}, returned={})",
                    self.scope,
                    records.len()
                );
                records
            }
            Err(err) => {
                warn!("memory list failed (scope={}): {}", self.scope, err);
                Vec::new()
            }
        }
    }
}

/// Merge the record kind into caller-provided metadata under `type`.
fn tag_metadata(kind: &str, extra: Value) -> Value {
    let mut metadata = serde_json::Map::new();
    metadata.insert("type".to_string(), Value::String(kind.to_string()));
    if let Value::Object(entries) = extra {
        metadata.extend(entries);
    }
    Value::Object(metadata)
}
