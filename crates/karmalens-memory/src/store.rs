//! Memory store boundary and the hosted-API client.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::MemoryStoreError;
use crate::model::{MemoryMessage, MemoryRecord};
use crate::scope::UserScope;

/// Append-only, scope-partitioned record store.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Append a record distilled from the given messages.
    async fn add(
        &self,
        scope: &UserScope,
        messages: &[MemoryMessage],
        metadata: Value,
    ) -> Result<(), MemoryStoreError>;

    /// Semantic search within one scope, relevance-descending, at most
    /// `limit` records.
    async fn search(
        &self,
        scope: &UserScope,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, MemoryStoreError>;

    /// Every record stored under the scope.
    async fn get_all(&self, scope: &UserScope) -> Result<Vec<MemoryRecord>, MemoryStoreError>;

    /// Remove every record stored under the scope.
    async fn delete_all(&self, scope: &UserScope) -> Result<(), MemoryStoreError>;
}

/// Client for the hosted memory service.
///
/// Speaks the `/v1/memories` REST surface with `Token` authorization.
pub struct HttpMemoryStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpMemoryStore {
    /// Create a client for the given service root and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_value(&self) -> String {
        format!("Token {}", self.api_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, MemoryStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(MemoryStoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// The service has returned both a bare array and a `results` wrapper
/// across API revisions; accept either.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordsEnvelope {
    Wrapped { results: Vec<MemoryRecord> },
    Bare(Vec<MemoryRecord>),
}

impl RecordsEnvelope {
    fn into_records(self) -> Vec<MemoryRecord> {
        match self {
            RecordsEnvelope::Wrapped { results } => results,
            RecordsEnvelope::Bare(records) => records,
        }
    }
}

#[async_trait]
impl MemoryStore for HttpMemoryStore {
    async fn add(
        &self,
        scope: &UserScope,
        messages: &[MemoryMessage],
        metadata: Value,
    ) -> Result<(), MemoryStoreError> {
        let body = json!({
            "messages": messages,
            "user_id": scope.as_str(),
            "metadata": metadata,
        });
        let response = self
            .client
            .post(self.url("/v1/memories/"))
            .header(AUTHORIZATION, self.auth_value())
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        debug!("memory added (scope={}, messages={})", scope, messages.len());
        Ok(())
    }

    async fn search(
        &self,
        scope: &UserScope,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, MemoryStoreError> {
        let body = json!({
            "query": query,
            "user_id": scope.as_str(),
            "limit": limit,
        });
        let response = self
            .client
            .post(self.url("/v1/memories/search/"))
            .header(AUTHORIZATION, self.auth_value())
            .json(&body)
            .send()
            .await?;
        let payload: Value = Self::check(response).await?.json().await?;
        let envelope: RecordsEnvelope = serde_json::from_value(payload)?;
        let mut records = envelope.into_records();
        records.truncate(limit);
        debug!(
            "memory search (scope={}, limit={}, returned={})",
            scope,
            limit,
            records.len()
        );
        Ok(records)
    }

    async fn get_all(&self, scope: &UserScope) -> Result<Vec<MemoryRecord>, MemoryStoreError> {
        let response = self
            .client
            .get(self.url("/v1/memories/"))
            .header(AUTHORIZATION, self.auth_value())
            .query(&[("user_id", scope.as_str())])
            .send()
            .await?;
        let payload: Value = Self::check(response).await?.json().await?;
        let envelope: RecordsEnvelope = serde_json::from_value(payload)?;
        let records = envelope.into_records();
        debug!("memory list (scope={}, returned={})", scope, records.len());
        Ok(records)
    }

    async fn delete_all(&self, scope: &UserScope) -> Result<(), MemoryStoreError> {
        let response = self
            .client
            .delete(self.url("/v1/memories/"))
            .header(AUTHORIZATION, self.auth_value())
            .query(&[("user_id", scope.as_str())])
            .send()
            .await?;
        Self::check(response).await?;
        debug!("memory wiped (scope={})", scope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{HttpMemoryStore, RecordsEnvelope};

    #[test]
    fn url_joining_strips_trailing_slash() {
        let store = HttpMemoryStore::new("https://api.mem0.ai/", "key");
        assert_eq!(store.url("/v1/memories/"), "https://api.mem0.ai/v1/memories/");
    }

    #[test]
    fn auth_header_uses_token_scheme() {
        let store = HttpMemoryStore::new("https://api.mem0.ai", "secret-key");
        assert_eq!(store.auth_value(), "Token secret-key");
    }

    #[test]
    fn envelope_accepts_wrapped_results() {
        let envelope: RecordsEnvelope = serde_json::from_value(json!({
            "results": [{ "memory": "wrapped" }],
        }))
        .expect("envelope");

        let records = envelope.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "wrapped");
    }

    #[test]
    fn envelope_accepts_bare_arrays() {
        let envelope: RecordsEnvelope =
            serde_json::from_value(json!([{ "memory": "bare" }])).expect("envelope");

        let records = envelope.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "bare");
    }
}
