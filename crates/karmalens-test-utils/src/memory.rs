use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use karmalens_memory::{MemoryMessage, MemoryRecord, MemoryStore, MemoryStoreError, UserScope};
use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

/// In-memory store partitioned by scope. Search ignores the query and
/// returns the scope's records in insertion order, which keeps relevance
/// ranking out of test assertions.
#[derive(Clone, Default)]
pub struct RecordingMemoryStore {
    records: Arc<Mutex<HashMap<String, Vec<MemoryRecord>>>>,
}

impl RecordingMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, scope: &UserScope, text: impl Into<String>) {
        self.insert(scope, text.into(), Value::Null);
    }

    pub fn records_for(&self, scope: &UserScope) -> Vec<MemoryRecord> {
        self.records
            .lock()
            .get(scope.as_str())
            .cloned()
            .unwrap_or_default()
    }

    fn insert(&self, scope: &UserScope, text: String, metadata: Value) {
        let record = MemoryRecord {
            id: Uuid::new_v4().to_string(),
            text,
            metadata,
            owner_scope: scope.as_str().to_string(),
            created_at: Some(Utc::now()),
            score: None,
        };
        self.records
            .lock()
            .entry(scope.as_str().to_string())
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl MemoryStore for RecordingMemoryStore {
    async fn add(
        &self,
        scope: &UserScope,
        messages: &[MemoryMessage],
        metadata: Value,
    ) -> Result<(), MemoryStoreError> {
        let text = messages
            .iter()
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.insert(scope, text, metadata);
        Ok(())
    }

    async fn search(
        &self,
        scope: &UserScope,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, MemoryStoreError> {
        let mut records = self.records_for(scope);
        records.truncate(limit);
        Ok(records)
    }

    async fn get_all(&self, scope: &UserScope) -> Result<Vec<MemoryRecord>, MemoryStoreError> {
        Ok(self.records_for(scope))
    }

    async fn delete_all(&self, scope: &UserScope) -> Result<(), MemoryStoreError> {
        self.records.lock().remove(scope.as_str());
        Ok(())
    }
}

/// Store where every operation fails with a service error. Attempted
/// operations are logged by name so tests can assert a call was made.
#[derive(Clone)]
pub struct FailingMemoryStore {
    message: String,
    pub attempts: Arc<Mutex<Vec<&'static str>>>,
}

impl FailingMemoryStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn fail(&self, op: &'static str) -> MemoryStoreError {
        self.attempts.lock().push(op);
        MemoryStoreError::Api {
            status: 503,
            message: self.message.clone(),
        }
    }
}

#[async_trait]
impl MemoryStore for FailingMemoryStore {
    async fn add(
        &self,
        _scope: &UserScope,
        _messages: &[MemoryMessage],
        _metadata: Value,
    ) -> Result<(), MemoryStoreError> {
        Err(self.fail("add"))
    }

    async fn search(
        &self,
        _scope: &UserScope,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<MemoryRecord>, MemoryStoreError> {
        Err(self.fail("search"))
    }

    async fn get_all(&self, _scope: &UserScope) -> Result<Vec<MemoryRecord>, MemoryStoreError> {
        Err(self.fail("get_all"))
    }

    async fn delete_all(&self, _scope: &UserScope) -> Result<(), MemoryStoreError> {
        Err(self.fail("delete_all"))
    }
}
