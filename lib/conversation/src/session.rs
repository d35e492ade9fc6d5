//! Session bookkeeping.
//!
//! A session is one live voice conversation. Dialogue state is owned
//! exclusively by the session's worker task, so no locking is needed
//! around it.

use chrono::{DateTime, Utc};
use switchboard_core::{DialogueState, SessionId};

/// A live voice conversation.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// Routing and contact-selection state.
    pub dialogue: DialogueState,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session last processed an event.
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            dialogue: DialogueState::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    /// Creates a session with a known id, e.g. from the transport.
    #[must_use]
    pub fn with_id(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            dialogue: DialogueState::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    /// Marks the session as active now.
    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
