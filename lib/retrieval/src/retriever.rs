//! The retrieval boundary trait and its types.

use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default number of documents requested per query.
const DEFAULT_TOP_K: usize = 3;

/// Default minimum similarity score.
const DEFAULT_SCORE_THRESHOLD: f64 = 0.5;

/// A document returned by similarity search, with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Document content.
    pub content: String,
    /// Similarity score.
    pub score: f64,
}

/// Search policy: how many documents to request and the score floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalPolicy {
    /// Number of top-ranked documents to request.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Minimum similarity score for a document to count as a hit.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_score_threshold() -> f64 {
    DEFAULT_SCORE_THRESHOLD
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }
}

/// Trait for the external similarity-search backend.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Searches for documents matching the query under the policy.
    ///
    /// Returns documents in ranked order, already filtered to the score
    /// threshold. Zero results is an ordinary outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`RetrievalError`] on transport failure; the caller
    /// degrades to the zero-result branch.
    async fn search(
        &self,
        query: &str,
        policy: &RetrievalPolicy,
    ) -> Result<Vec<ScoredDocument>, RetrievalError>;
}

/// A retriever over a fixed document set, for tests and local runs.
///
/// Matches by case-insensitive substring and assigns every hit a score
/// above the default threshold.
#[derive(Debug, Default)]
pub struct StaticRetriever {
    documents: Vec<String>,
    /// If set, every search fails with this error.
    pub fail_with: Option<RetrievalError>,
}

impl StaticRetriever {
    /// Creates a retriever over the given documents.
    #[must_use]
    pub fn new(documents: Vec<String>) -> Self {
        Self {
            documents,
            fail_with: None,
        }
    }

    /// Creates a retriever that fails every search.
    #[must_use]
    pub fn failing(error: RetrievalError) -> Self {
        Self {
            documents: Vec::new(),
            fail_with: Some(error),
        }
    }
}

#[async_trait]
impl KnowledgeRetriever for StaticRetriever {
    async fn search(
        &self,
        query: &str,
        policy: &RetrievalPolicy,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }

        let needle = query.to_lowercase();
        let hits = self
            .documents
            .iter()
            .filter(|doc| doc.to_lowercase().contains(&needle))
            .take(policy.top_k)
            .map(|doc| ScoredDocument {
                content: doc.clone(),
                score: 0.9,
            })
            .collect();

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_defaults() {
        let policy = RetrievalPolicy::default();
        assert_eq!(policy.top_k, 3);
        assert!((policy.score_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn policy_serde_fills_defaults() {
        let policy: RetrievalPolicy = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(policy.top_k, 3);
    }

    #[tokio::test]
    async fn static_retriever_matches_substring() {
        let retriever = StaticRetriever::new(vec![
            "Our office hours are 9 to 5.".to_string(),
            "Pricing starts at 100 per seat.".to_string(),
        ]);

        let hits = retriever
            .search("office hours", &RetrievalPolicy::default())
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert!(hits[0].content.contains("9 to 5"));
    }

    #[tokio::test]
    async fn static_retriever_respects_top_k() {
        let retriever = StaticRetriever::new(vec![
            "plan a".to_string(),
            "plan b".to_string(),
            "plan c".to_string(),
            "plan d".to_string(),
        ]);

        let policy = RetrievalPolicy {
            top_k: 2,
            ..Default::default()
        };
        let hits = retriever.search("plan", &policy).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn failing_retriever_reports_error() {
        let retriever = StaticRetriever::failing(RetrievalError::BackendUnavailable {
            reason: "down".to_string(),
        });

        let result = retriever.search("anything", &RetrievalPolicy::default()).await;
        assert!(result.is_err());
    }
}
