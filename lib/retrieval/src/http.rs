//! HTTP retriever client.
//!
//! Talks to the vector-search service over a small JSON API: the query
//! and policy go out, ranked scored documents come back. The backend is
//! expected to apply the score threshold; documents are passed through
//! in the order received.

use crate::error::RetrievalError;
use crate::retriever::{KnowledgeRetriever, RetrievalPolicy, ScoredDocument};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the HTTP retriever.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpRetrieverConfig {
    /// Search endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
    score_threshold: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    documents: Vec<ScoredDocument>,
}

/// HTTP-backed knowledge retriever.
pub struct HttpRetriever {
    client: reqwest::Client,
    config: HttpRetrieverConfig,
}

impl HttpRetriever {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`RetrievalError`] if the HTTP client cannot be built.
    pub fn new(config: HttpRetrieverConfig) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RetrievalError::BackendUnavailable {
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl KnowledgeRetriever for HttpRetriever {
    async fn search(
        &self,
        query: &str,
        policy: &RetrievalPolicy,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let request = SearchRequest {
            query,
            top_k: policy.top_k,
            score_threshold: policy.score_threshold,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RetrievalError::BackendUnavailable {
                reason: e.to_string(),
            })?;

        let parsed: SearchResponse =
            response
                .json()
                .await
                .map_err(|e| RetrievalError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        tracing::debug!(hits = parsed.documents.len(), "retrieval query completed");
        Ok(parsed.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_timeout() {
        let config: HttpRetrieverConfig = serde_json::from_value(serde_json::json!({
            "endpoint": "http://localhost:8080/search"
        }))
        .expect("deserialize");

        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn search_request_wire_shape() {
        let request = SearchRequest {
            query: "hours",
            top_k: 3,
            score_threshold: 0.5,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["query"], "hours");
        assert_eq!(json["top_k"], 3);
    }
}
