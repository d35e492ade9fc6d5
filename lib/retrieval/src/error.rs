//! Error types for the retrieval crate.
//!
//! Retrieval failures never abort a dialogue turn: the coordinator
//! degrades to the no-document routing branch. The error exists so the
//! degradation can be logged with a reason.

use std::fmt;

/// Errors from knowledge retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    /// The backend could not be reached.
    BackendUnavailable { reason: String },
    /// The backend replied with something unusable.
    InvalidResponse { reason: String },
}

impl fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackendUnavailable { reason } => {
                write!(f, "retrieval backend unavailable: {reason}")
            }
            Self::InvalidResponse { reason } => {
                write!(f, "invalid retrieval response: {reason}")
            }
        }
    }
}

impl std::error::Error for RetrievalError {}
