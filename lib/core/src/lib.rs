//! Core domain types for the switchboard voice assistant.
//!
//! This crate provides the foundational types shared across the
//! conversation and contact-operations crates: strongly-typed ids,
//! the per-session dialogue state, and the error handling foundation.

pub mod dialogue;
pub mod error;
pub mod id;

pub use dialogue::{DialogueState, PendingIntent};
pub use error::Result;
pub use id::{MessageId, SessionId};
