//! Error types for the conversation crate.

use crate::channel::ChannelError;

/// A failure that abandons the current dialogue turn.
///
/// Turn-local errors like retrieval failures or store misses are
/// handled inside the routing algorithm; a fault means the channel
/// itself could not be written and no further mutation happens this
/// turn. The session stays alive for the next utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionFault {
    /// A channel write failed mid-turn.
    Channel(ChannelError),
}

impl std::fmt::Display for SessionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Channel(e) => write!(f, "session channel fault: {e}"),
        }
    }
}

impl std::error::Error for SessionFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Channel(e) => Some(e),
        }
    }
}

impl From<ChannelError> for SessionFault {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_display_includes_cause() {
        let fault = SessionFault::from(ChannelError::Disconnected);
        assert!(fault.to_string().contains("disconnected"));
    }
}
