//! Tool layer for the model's function-calling interface.
//!
//! The realtime model invokes contact operations by name with JSON
//! arguments. The dispatcher deserializes the arguments, runs the
//! operation against the session's dialogue state, and formats the
//! outcome into the reply string the model reads back to the user.

use crate::contact::{ContactUpdate, NewContact};
use crate::ops::{
    ContactOperations, CreateOutcome, CreateWithMeetingOutcome, LookupOutcome, ScheduleOutcome,
    UpdateOutcome,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use switchboard_core::DialogueState;

/// Definition of a tool exposed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON schema for input parameters.
    pub input_schema: JsonValue,
}

impl ToolDefinition {
    fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }

    /// Converts the definition to the format expected by the realtime
    /// model API.
    #[must_use]
    pub fn model_format(&self) -> JsonValue {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.input_schema,
        })
    }
}

fn contact_properties() -> JsonValue {
    serde_json::json!({
        "phone": { "type": "string", "description": "Contact's phone number" },
        "mail": { "type": "string", "description": "Contact's email" },
        "name": { "type": "string", "description": "Contact's name" },
        "companyName": { "type": "string", "description": "Contact's company name" },
        "meetingTs": { "type": "string", "description": "Preferred meeting time" },
    })
}

/// The contact tools exposed to the model's function-calling layer.
#[must_use]
pub fn contact_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "lookup_contact",
            "lookup a contact by phone number",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "phone": { "type": "string", "description": "Contact's phone number" }
                },
                "required": ["phone"]
            }),
        ),
        ToolDefinition::new(
            "create_contact",
            "create new contact",
            serde_json::json!({
                "type": "object",
                "properties": contact_properties(),
                "required": ["phone", "mail", "name", "companyName", "meetingTs"]
            }),
        ),
        ToolDefinition::new(
            "update_contact_details",
            "Update contact details",
            serde_json::json!({
                "type": "object",
                "properties": contact_properties(),
                "required": ["phone"]
            }),
        ),
        ToolDefinition::new(
            "schedule_meeting_for_contact",
            "Schedule meeting for existing contact",
            serde_json::json!({ "type": "object", "properties": {} }),
        ),
        ToolDefinition::new(
            "create_contact_with_meeting",
            "Create contact and schedule meeting",
            serde_json::json!({
                "type": "object",
                "properties": contact_properties(),
                "required": ["phone", "mail", "name", "companyName", "meetingTs"]
            }),
        ),
    ]
}

/// Arguments for tools addressed by phone number.
#[derive(Debug, Deserialize)]
struct PhoneArgs {
    phone: String,
}

/// Arguments for the update tool: the phone key plus the update set.
#[derive(Debug, Deserialize)]
struct UpdateArgs {
    phone: String,
    #[serde(flatten)]
    update: ContactUpdate,
}

/// Dispatches model tool calls to the contact operations.
pub struct ContactToolDispatcher {
    ops: Arc<ContactOperations>,
}

impl ContactToolDispatcher {
    /// Creates a dispatcher over the given operations.
    pub fn new(ops: Arc<ContactOperations>) -> Self {
        Self { ops }
    }

    /// Runs the named tool and returns the reply the model reads back.
    ///
    /// Every failure, including a store transport failure, is a reply
    /// string: tool calls never crash the session.
    pub async fn dispatch(
        &self,
        state: &mut DialogueState,
        name: &str,
        arguments: JsonValue,
    ) -> String {
        tracing::info!(tool = name, "dispatching tool call");
        match name {
            "lookup_contact" => self.lookup(state, arguments).await,
            "create_contact" => self.create(state, arguments).await,
            "update_contact_details" => self.update(arguments).await,
            "schedule_meeting_for_contact" => {
                format_schedule(self.ops.schedule_meeting(state).await)
            }
            "create_contact_with_meeting" => self.create_with_meeting(state, arguments).await,
            other => {
                tracing::warn!(tool = other, "unknown tool call");
                format!("Unknown tool: {other}")
            }
        }
    }

    async fn lookup(&self, state: &mut DialogueState, arguments: JsonValue) -> String {
        let args: PhoneArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return format!("Invalid arguments for lookup_contact: {e}"),
        };

        match self.ops.lookup(state, &args.phone).await {
            Ok(LookupOutcome::Found(contact)) => contact.summary(),
            Ok(LookupOutcome::NotFound) => "Contact not found".to_string(),
            Err(e) => format!("Failed to lookup contact: {e}"),
        }
    }

    async fn create(&self, state: &mut DialogueState, arguments: JsonValue) -> String {
        let input: NewContact = match serde_json::from_value(arguments) {
            Ok(input) => input,
            Err(e) => return format!("Invalid arguments for create_contact: {e}"),
        };

        match self.ops.create(state, input).await {
            Ok(outcome) => format_create(&outcome),
            Err(e) => format!("Failed to create contact: {e}"),
        }
    }

    async fn update(&self, arguments: JsonValue) -> String {
        let args: UpdateArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return format!("Invalid arguments for update_contact_details: {e}"),
        };

        match self.ops.update(&args.phone, args.update).await {
            Ok(UpdateOutcome::Updated(contact)) => {
                format!("Contact with phone {} updated successfully", contact.phone)
            }
            Ok(UpdateOutcome::NotFound) => {
                format!("Failed to update contact with phone: {}", args.phone)
            }
            Ok(UpdateOutcome::NoFieldsProvided) => "No fields provided for update".to_string(),
            Err(e) => format!("Failed to update contact: {e}"),
        }
    }

    async fn create_with_meeting(&self, state: &mut DialogueState, arguments: JsonValue) -> String {
        let input: NewContact = match serde_json::from_value(arguments) {
            Ok(input) => input,
            Err(e) => return format!("Invalid arguments for create_contact_with_meeting: {e}"),
        };

        match self.ops.create_with_meeting(state, input).await {
            Ok(outcome) => format_create_with_meeting(&outcome),
            Err(e) => format!("Failed to create contact: {e}"),
        }
    }
}

fn format_create(outcome: &CreateOutcome) -> String {
    match outcome {
        CreateOutcome::Created(_) => "Contact created successfully".to_string(),
        CreateOutcome::AlreadyExists => {
            "A contact with this phone number already exists".to_string()
        }
        CreateOutcome::Invalid(validation) => format!("Failed to create contact: {validation}"),
    }
}

fn format_schedule(outcome: ScheduleOutcome) -> String {
    match outcome {
        ScheduleOutcome::Scheduled => "Meeting scheduled successfully".to_string(),
        ScheduleOutcome::NoContactSelected => {
            "No contact selected. Please lookup or create a contact first.".to_string()
        }
        ScheduleOutcome::InvalidMeetingTime => "Invalid meeting time format".to_string(),
        ScheduleOutcome::SlotUnavailable => "Selected time slot is not available".to_string(),
        ScheduleOutcome::SchedulingFailed => "Failed to schedule meeting".to_string(),
    }
}

fn format_create_with_meeting(outcome: &CreateWithMeetingOutcome) -> String {
    let create = format_create(&outcome.create);
    match outcome.schedule {
        Some(schedule) => format!("{create} and {}", format_schedule(schedule)),
        None => create,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::SchedulingConfig;
    use crate::store::MemoryContactStore;
    use async_trait::async_trait;
    use switchboard_calendar::{CalendarService, EventRequest, MeetingWindow};

    struct AlwaysFreeCalendar;

    #[async_trait]
    impl CalendarService for AlwaysFreeCalendar {
        async fn check_availability(&self, _window: &MeetingWindow) -> bool {
            true
        }

        async fn create_event(&self, _event: &EventRequest) -> bool {
            true
        }
    }

    fn dispatcher() -> ContactToolDispatcher {
        let ops = ContactOperations::new(
            Arc::new(MemoryContactStore::new()),
            Arc::new(AlwaysFreeCalendar),
            SchedulingConfig::default(),
        );
        ContactToolDispatcher::new(Arc::new(ops))
    }

    fn create_args() -> JsonValue {
        serde_json::json!({
            "phone": "123",
            "mail": "a@b.com",
            "name": "A",
            "companyName": "C",
            "meetingTs": "2025-01-01T10:00:00"
        })
    }

    #[test]
    fn five_tools_are_defined() {
        let definitions = contact_tool_definitions();
        let names: Vec<_> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "lookup_contact",
                "create_contact",
                "update_contact_details",
                "schedule_meeting_for_contact",
                "create_contact_with_meeting",
            ]
        );
    }

    #[test]
    fn model_format_carries_schema() {
        let definition = &contact_tool_definitions()[0];
        let formatted = definition.model_format();
        assert_eq!(formatted["name"], "lookup_contact");
        assert!(formatted["parameters"]["properties"]["phone"].is_object());
    }

    #[tokio::test]
    async fn lookup_miss_replies_not_found() {
        let dispatcher = dispatcher();
        let mut state = DialogueState::new();

        let reply = dispatcher
            .dispatch(
                &mut state,
                "lookup_contact",
                serde_json::json!({"phone": "999"}),
            )
            .await;

        assert_eq!(reply, "Contact not found");
        assert!(!state.has_selected_contact());
    }

    #[tokio::test]
    async fn create_then_lookup_replies_summary() {
        let dispatcher = dispatcher();
        let mut state = DialogueState::new();

        let reply = dispatcher
            .dispatch(&mut state, "create_contact", create_args())
            .await;
        assert_eq!(reply, "Contact created successfully");

        let reply = dispatcher
            .dispatch(
                &mut state,
                "lookup_contact",
                serde_json::json!({"phone": "123"}),
            )
            .await;
        assert!(reply.starts_with("Contact found:"));
        assert!(reply.contains("Company: C"));
    }

    #[tokio::test]
    async fn update_with_no_fields_is_reported_distinctly() {
        let dispatcher = dispatcher();
        let mut state = DialogueState::new();
        dispatcher
            .dispatch(&mut state, "create_contact", create_args())
            .await;

        let reply = dispatcher
            .dispatch(
                &mut state,
                "update_contact_details",
                serde_json::json!({"phone": "123"}),
            )
            .await;

        assert_eq!(reply, "No fields provided for update");
    }

    #[tokio::test]
    async fn composite_tool_reports_both_results() {
        let dispatcher = dispatcher();
        let mut state = DialogueState::new();

        let reply = dispatcher
            .dispatch(&mut state, "create_contact_with_meeting", create_args())
            .await;

        assert_eq!(
            reply,
            "Contact created successfully and Meeting scheduled successfully"
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let dispatcher = dispatcher();
        let mut state = DialogueState::new();

        let reply = dispatcher
            .dispatch(&mut state, "send_fax", serde_json::json!({}))
            .await;

        assert!(reply.contains("Unknown tool"));
    }
}
