//! Error types for the contacts crate.
//!
//! Store transport failures are the only errors here; operation
//! outcomes (not found, already exists, validation, scheduling
//! failures) are variants of the outcome enums in [`crate::ops`],
//! never errors.

use std::fmt;

/// Errors from contact store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached.
    Unavailable { reason: String },
    /// A query failed at the transport or decoding layer.
    QueryFailed { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "contact store unavailable: {reason}"),
            Self::QueryFailed { reason } => write!(f, "contact store query failed: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}
