//! Calendar scheduling boundary for the switchboard voice assistant.
//!
//! This crate provides:
//!
//! - **Meeting window**: the fixed offset range derived from a requested
//!   meeting timestamp
//! - **Calendar service**: the availability-check + event-creation
//!   boundary, where transport failures degrade to unavailability
//! - **Nylas client**: an HTTP implementation of the boundary

pub mod client;
pub mod error;
pub mod window;

pub use client::{CalendarService, EventRequest, NylasCalendar, NylasConfig};
pub use error::ClientError;
pub use window::{parse_meeting_ts, MeetingWindow};
