//! Dialogue routing and session plumbing for the switchboard voice
//! assistant.
//!
//! A session is a live realtime-model conversation. Committed user
//! utterances are routed by the [`DialogueCoordinator`] to one of three
//! handling paths: answer directly from the knowledge base, forward to
//! the model with a selected contact in scope, or steer the model
//! toward contact lookup. The [`SessionChannel`] trait is the seam to
//! the realtime transport; a NATS-backed implementation lives in
//! [`nats`].

pub mod channel;
pub mod coordinator;
pub mod error;
pub mod message;
pub mod nats;
pub mod prompts;
pub mod session;
pub mod worker;

pub use channel::{ChannelError, RecordedWrite, RecordingChannel, SessionChannel};
pub use coordinator::{DialogueCoordinator, TurnRoute};
pub use error::SessionFault;
pub use message::{Message, MessageRole, UtteranceContent, UtteranceSegment};
pub use nats::{run_inbound_loop, NatsChannel, NatsChannelConfig, NatsChannelFactory};
pub use session::Session;
pub use worker::{ChannelFactory, SessionEvent, SessionRegistry, SessionWorker};
