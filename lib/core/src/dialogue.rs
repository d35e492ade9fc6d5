//! Per-session dialogue state.
//!
//! Each live conversation owns exactly one [`DialogueState`]. It is
//! threaded explicitly through every routing step and contact operation
//! rather than hidden behind an instance attribute, so the caller always
//! knows which state a mutation applies to.
//!
//! The selected contact is a weak reference by phone number: holders
//! must revalidate it against the contact store before use, never assume
//! it is fresh.

use serde::{Deserialize, Serialize};

/// The intent the dialogue is currently waiting on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingIntent {
    /// Nothing pending.
    #[default]
    None,
    /// The model was asked to look up or create a contact from the
    /// user's utterance.
    AwaitingContactLookup,
    /// A contact with a requested meeting time is selected and the
    /// meeting has not been scheduled yet.
    AwaitingMeetingConfirmation,
}

/// Mutable dialogue state for one session.
///
/// Owned exclusively by that session's coordinator turn loop; mutated
/// only by routing steps and contact operations, and destroyed with the
/// session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueState {
    selected_phone: Option<String>,
    pending_intent: PendingIntent,
}

impl DialogueState {
    /// Creates an empty dialogue state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the phone number of the selected contact, if any.
    ///
    /// This is a weak reference: the contact may no longer exist in the
    /// store.
    #[must_use]
    pub fn selected_phone(&self) -> Option<&str> {
        self.selected_phone.as_deref()
    }

    /// Returns true if a contact is currently selected.
    #[must_use]
    pub fn has_selected_contact(&self) -> bool {
        self.selected_phone.is_some()
    }

    /// Selects the contact with the given phone number.
    pub fn select_contact(&mut self, phone: impl Into<String>) {
        self.selected_phone = Some(phone.into());
    }

    /// Clears the contact selection.
    pub fn clear_selected_contact(&mut self) {
        self.selected_phone = None;
    }

    /// Returns the pending intent.
    #[must_use]
    pub fn pending_intent(&self) -> PendingIntent {
        self.pending_intent
    }

    /// Sets the pending intent.
    pub fn set_pending_intent(&mut self, intent: PendingIntent) {
        self.pending_intent = intent;
    }
}
