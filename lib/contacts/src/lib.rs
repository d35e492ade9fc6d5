//! Contact management for the switchboard voice assistant.
//!
//! This crate provides:
//!
//! - **Contact entity**: the phone-keyed contact record and its
//!   creation-time validation
//! - **Contact store**: the persistence boundary plus an in-memory
//!   implementation
//! - **Contact operations**: lookup, create, update, and
//!   meeting-scheduling operations with named outcome types
//! - **Tool layer**: the registry and dispatcher the model's
//!   function-calling layer invokes

pub mod contact;
pub mod error;
pub mod ops;
pub mod store;
pub mod tools;

pub use contact::{Contact, ContactUpdate, NewContact, ValidationError};
pub use error::StoreError;
pub use ops::{
    ContactOperations, CreateOutcome, CreateWithMeetingOutcome, LookupOutcome, ScheduleOutcome,
    SchedulingConfig, UpdateOutcome,
};
pub use store::{ContactStore, FailingContactStore, MemoryContactStore};
pub use tools::{contact_tool_definitions, ContactToolDispatcher};
