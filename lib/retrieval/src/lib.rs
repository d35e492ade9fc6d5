//! Knowledge retrieval boundary for the switchboard voice assistant.
//!
//! The retriever is an external similarity-search backend; this crate
//! defines the boundary trait, the ranked document type, the default
//! search policy, and an HTTP client implementation.

pub mod error;
pub mod http;
pub mod retriever;

pub use error::RetrievalError;
pub use http::{HttpRetriever, HttpRetrieverConfig};
pub use retriever::{KnowledgeRetriever, RetrievalPolicy, ScoredDocument, StaticRetriever};
