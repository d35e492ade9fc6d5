//! Callable contact operations.
//!
//! These are the operations the dialogue coordinator and the model's
//! function-calling layer both invoke. Every outcome the caller needs
//! to distinguish is a named variant; the only `Err` anywhere is a
//! store transport failure, which the caller formats and reports
//! without crashing the session.
//!
//! Operations thread the session's [`DialogueState`] explicitly. No
//! operation leaves the state partially mutated: selection and pending
//! intent only move after the operation's external outcome is known.

use crate::contact::{Contact, ContactUpdate, NewContact, ValidationError};
use crate::error::StoreError;
use crate::store::ContactStore;
use serde::Deserialize;
use std::sync::Arc;
use switchboard_calendar::{parse_meeting_ts, CalendarService, EventRequest, MeetingWindow};
use switchboard_core::{DialogueState, PendingIntent};

/// Result of a contact lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Contact found; the session selection now points at it.
    Found(Contact),
    /// No contact with that phone exists.
    NotFound,
}

/// Result of a contact creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Contact created; the session selection now points at it.
    Created(Contact),
    /// A contact with that phone already exists.
    AlreadyExists,
    /// Required fields were empty or missing.
    Invalid(ValidationError),
}

impl CreateOutcome {
    /// Returns true for the `Created` variant.
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Result of a contact update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Contact updated.
    Updated(Contact),
    /// No contact with that phone exists.
    NotFound,
    /// No recognized fields were provided. Distinct from an error; the
    /// caller continues normally.
    NoFieldsProvided,
}

/// Result of scheduling a meeting for the selected contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// The meeting was booked.
    Scheduled,
    /// No contact is selected, or the selection no longer resolves in
    /// the store.
    NoContactSelected,
    /// The contact's meeting timestamp could not be parsed. Reported,
    /// not retried; the calendar is never called.
    InvalidMeetingTime,
    /// The availability check reported a conflict. Terminal for this
    /// attempt; no renegotiation of the time.
    SlotUnavailable,
    /// Event creation failed downstream.
    SchedulingFailed,
}

/// Composite result of create-then-schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWithMeetingOutcome {
    /// The creation result.
    pub create: CreateOutcome,
    /// The scheduling result; absent when creation failed and
    /// scheduling was short-circuited.
    pub schedule: Option<ScheduleOutcome>,
}

/// Settings applied to every scheduled event.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    /// IANA timezone label passed to the calendar service.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Event location.
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_timezone() -> String {
    "Asia/Jerusalem".to_string()
}

fn default_location() -> String {
    "Office".to_string()
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            location: default_location(),
        }
    }
}

/// The contact operations, bound to a store and a calendar service.
pub struct ContactOperations {
    store: Arc<dyn ContactStore>,
    calendar: Arc<dyn CalendarService>,
    scheduling: SchedulingConfig,
}

impl ContactOperations {
    /// Creates the operations over the given collaborators.
    pub fn new(
        store: Arc<dyn ContactStore>,
        calendar: Arc<dyn CalendarService>,
        scheduling: SchedulingConfig,
    ) -> Self {
        Self {
            store,
            calendar,
            scheduling,
        }
    }

    /// Returns the store these operations run against.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ContactStore> {
        &self.store
    }

    /// Looks up a contact by phone number.
    ///
    /// On success the session selection moves to this contact and a
    /// pending lookup intent is resolved.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on transport failure; the selection is
    /// left unchanged.
    pub async fn lookup(
        &self,
        state: &mut DialogueState,
        phone: &str,
    ) -> Result<LookupOutcome, StoreError> {
        match self.store.get_by_phone(phone).await? {
            Some(contact) => {
                state.select_contact(&contact.phone);
                if state.pending_intent() == PendingIntent::AwaitingContactLookup {
                    state.set_pending_intent(PendingIntent::None);
                }
                tracing::info!(phone, "contact selected via lookup");
                Ok(LookupOutcome::Found(contact))
            }
            None => Ok(LookupOutcome::NotFound),
        }
    }

    /// Creates a new contact.
    ///
    /// The store performs the existence check and insert as one logical
    /// unit, so concurrent duplicate creates for the same phone yield
    /// exactly one `Created`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on transport failure.
    pub async fn create(
        &self,
        state: &mut DialogueState,
        input: NewContact,
    ) -> Result<CreateOutcome, StoreError> {
        if let Err(validation) = input.validate() {
            return Ok(CreateOutcome::Invalid(validation));
        }

        let contact = input.into_contact();
        if !self.store.insert_if_absent(&contact).await? {
            return Ok(CreateOutcome::AlreadyExists);
        }

        state.select_contact(&contact.phone);
        state.set_pending_intent(if contact.meeting_ts.trim().is_empty() {
            PendingIntent::None
        } else {
            PendingIntent::AwaitingMeetingConfirmation
        });

        tracing::info!(phone = %contact.phone, "contact created and selected");
        Ok(CreateOutcome::Created(contact))
    }

    /// Updates the provided fields of an existing contact.
    ///
    /// Never changes the session selection; an empty update set is the
    /// distinct `NoFieldsProvided` outcome, and the stored row is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on transport failure.
    pub async fn update(
        &self,
        phone: &str,
        update: ContactUpdate,
    ) -> Result<UpdateOutcome, StoreError> {
        if update.is_empty() {
            return Ok(UpdateOutcome::NoFieldsProvided);
        }

        match self.store.update_fields(phone, &update).await? {
            Some(contact) => Ok(UpdateOutcome::Updated(contact)),
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    /// Schedules a meeting for the currently selected contact.
    ///
    /// The selection is a weak reference: the contact is re-resolved
    /// from the store before use, and a dangling or unreadable
    /// selection reports `NoContactSelected`.
    pub async fn schedule_meeting(&self, state: &mut DialogueState) -> ScheduleOutcome {
        let Some(phone) = state.selected_phone().map(str::to_owned) else {
            return ScheduleOutcome::NoContactSelected;
        };

        let contact = match self.store.get_by_phone(&phone).await {
            Ok(Some(contact)) => contact,
            Ok(None) => {
                state.clear_selected_contact();
                return ScheduleOutcome::NoContactSelected;
            }
            Err(e) => {
                tracing::warn!(error = %e, phone, "selected contact could not be resolved");
                return ScheduleOutcome::NoContactSelected;
            }
        };

        let Some(requested) = parse_meeting_ts(&contact.meeting_ts) else {
            tracing::warn!(phone, meeting_ts = %contact.meeting_ts, "invalid meeting time");
            return ScheduleOutcome::InvalidMeetingTime;
        };

        let window = MeetingWindow::from_requested(requested);
        if !self.calendar.check_availability(&window).await {
            return ScheduleOutcome::SlotUnavailable;
        }

        let event = EventRequest {
            title: format!("Meeting with {}", contact.name),
            description: format!(
                "Automatically scheduled meeting with {} from {}, phone {}",
                contact.name, contact.company_name, contact.phone
            ),
            window,
            timezone: self.scheduling.timezone.clone(),
            location: self.scheduling.location.clone(),
            participant_email: contact.mail.clone(),
            participant_name: contact.name.clone(),
        };

        if !self.calendar.create_event(&event).await {
            return ScheduleOutcome::SchedulingFailed;
        }

        state.set_pending_intent(PendingIntent::None);
        ScheduleOutcome::Scheduled
    }

    /// Creates a contact and immediately schedules its meeting.
    ///
    /// Scheduling is short-circuited when creation did not succeed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on transport failure during creation.
    pub async fn create_with_meeting(
        &self,
        state: &mut DialogueState,
        input: NewContact,
    ) -> Result<CreateWithMeetingOutcome, StoreError> {
        let create = self.create(state, input).await?;
        if !create.is_created() {
            return Ok(CreateWithMeetingOutcome {
                create,
                schedule: None,
            });
        }

        let schedule = self.schedule_meeting(state).await;
        Ok(CreateWithMeetingOutcome {
            create,
            schedule: Some(schedule),
        })
    }
}
