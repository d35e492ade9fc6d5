//! Bootstrap error types for the agent process.

use std::fmt;

/// Errors raised while bringing the agent process up.
#[derive(Debug)]
pub enum BootstrapError {
    /// Configuration could not be loaded or parsed.
    InvalidConfig { details: String },
    /// The database was unreachable or migrations failed.
    DatabaseUnavailable { details: String },
    /// An outbound HTTP client could not be constructed.
    ClientBuildFailed {
        component: &'static str,
        details: String,
    },
    /// The NATS server was unreachable or the subscription ended.
    MessagingUnavailable { details: String },
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { details } => {
                write!(f, "invalid configuration: {}", details)
            }
            Self::DatabaseUnavailable { details } => {
                write!(f, "database unavailable: {}", details)
            }
            Self::ClientBuildFailed { component, details } => {
                write!(f, "failed to build {} client: {}", component, details)
            }
            Self::MessagingUnavailable { details } => {
                write!(f, "messaging unavailable: {}", details)
            }
        }
    }
}

impl std::error::Error for BootstrapError {}
