//! Error types for the calendar crate.
//!
//! Only client construction can fail with an error; calls against the
//! calendar boundary report plain booleans, with transport failures
//! treated as unavailability.

use std::fmt;

/// Errors from building a calendar client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Required configuration was missing or malformed.
    InvalidConfig { reason: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => {
                write!(f, "invalid calendar client configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for ClientError {}
