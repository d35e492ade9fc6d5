//! NATS transport for session channels.
//!
//! Outbound writes publish to per-session subjects:
//!
//! - `session.<id>.outbound.message` carries appended messages
//! - `session.<id>.outbound.response_request` asks for a model response
//!
//! Inbound events arrive on `session.<id>.inbound`; a single subscriber
//! consumes `session.*.inbound` and hands each event to the registry,
//! which preserves per-session ordering through the worker queues.

use crate::channel::{ChannelError, SessionChannel};
use crate::message::{Message, MessageRole};
use crate::worker::{ChannelFactory, SessionEvent, SessionRegistry};
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use switchboard_core::SessionId;

/// Subject prefix for session traffic.
const SESSION_SUBJECT_PREFIX: &str = "session";

/// Configuration for the NATS session transport.
#[derive(Debug, Clone, Deserialize)]
pub struct NatsChannelConfig {
    /// NATS server URL.
    pub url: String,
}

/// Outbound session channel over NATS.
pub struct NatsChannel {
    client: async_nats::Client,
    session_id: SessionId,
}

impl NatsChannel {
    /// Creates a channel for one session over an existing connection.
    #[must_use]
    pub fn new(client: async_nats::Client, session_id: SessionId) -> Self {
        Self { client, session_id }
    }

    fn message_subject(&self) -> String {
        format!("{SESSION_SUBJECT_PREFIX}.{}.outbound.message", self.session_id)
    }

    fn response_request_subject(&self) -> String {
        format!(
            "{SESSION_SUBJECT_PREFIX}.{}.outbound.response_request",
            self.session_id
        )
    }

    async fn publish(&self, subject: String, payload: Vec<u8>) -> Result<(), ChannelError> {
        self.client
            .publish(subject, payload.into())
            .await
            .map_err(|e| ChannelError::WriteFailed {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl SessionChannel for NatsChannel {
    async fn append_message(&self, role: MessageRole, content: &str) -> Result<(), ChannelError> {
        let payload = serde_json::to_vec(&Message::new(role, content)).map_err(|e| {
            ChannelError::WriteFailed {
                reason: format!("failed to serialize message: {e}"),
            }
        })?;

        self.publish(self.message_subject(), payload).await
    }

    async fn request_response(&self) -> Result<(), ChannelError> {
        self.publish(self.response_request_subject(), Vec::new())
            .await
    }
}

/// Channel factory backed by a shared NATS connection.
pub struct NatsChannelFactory {
    client: async_nats::Client,
}

impl NatsChannelFactory {
    /// Creates a factory over an existing connection.
    #[must_use]
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

impl ChannelFactory for NatsChannelFactory {
    fn channel_for(&self, session_id: SessionId) -> Arc<dyn SessionChannel> {
        Arc::new(NatsChannel::new(self.client.clone(), session_id))
    }
}

/// Returns the inbound subject for one session.
#[must_use]
pub fn inbound_subject(session_id: SessionId) -> String {
    format!("{SESSION_SUBJECT_PREFIX}.{session_id}.inbound")
}

/// Subscription pattern covering every session's inbound subject.
#[must_use]
pub fn inbound_wildcard() -> String {
    format!("{SESSION_SUBJECT_PREFIX}.*.inbound")
}

/// Consumes inbound session events and delivers them to the registry.
///
/// Runs until the subscription ends. Malformed payloads and unparsable
/// subjects are logged and skipped.
pub async fn run_inbound_loop(
    client: async_nats::Client,
    registry: Arc<SessionRegistry>,
) -> Result<(), ChannelError> {
    let mut subscription = client.subscribe(inbound_wildcard()).await.map_err(|e| {
        ChannelError::WriteFailed {
            reason: format!("failed to subscribe: {e}"),
        }
    })?;

    tracing::info!(subject = %inbound_wildcard(), "listening for session events");

    while let Some(message) = subscription.next().await {
        let Some(session_id) = session_id_from_subject(&message.subject) else {
            tracing::warn!(subject = %message.subject, "unparsable session subject");
            continue;
        };

        let event: SessionEvent = match serde_json::from_slice(&message.payload) {
            Ok(event) => event,
            Err(error) => {
                tracing::warn!(session = %session_id, %error, "malformed session event");
                continue;
            }
        };

        registry.deliver(session_id, event).await;
    }

    Ok(())
}

/// Extracts the session id from `session.<id>.inbound`.
fn session_id_from_subject(subject: &str) -> Option<SessionId> {
    let mut parts = subject.split('.');
    if parts.next() != Some(SESSION_SUBJECT_PREFIX) {
        return None;
    }
    let id = parts.next()?;
    if parts.next() != Some("inbound") {
        return None;
    }
    id.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_roundtrip() {
        let session_id = SessionId::new();
        let subject = inbound_subject(session_id);
        assert_eq!(session_id_from_subject(&subject), Some(session_id));
    }

    #[test]
    fn wildcard_covers_inbound_subjects() {
        assert_eq!(inbound_wildcard(), "session.*.inbound");
    }

    #[test]
    fn foreign_subjects_are_rejected() {
        assert_eq!(session_id_from_subject("workflow.run.x"), None);
        assert_eq!(session_id_from_subject("session.sess_x.outbound"), None);
    }

    #[test]
    fn outbound_message_wire_shape() {
        let msg = Message::new(MessageRole::Assistant, "hello");
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hello");
        assert!(json["id"].as_str().is_some_and(|id| id.len() == 26));
        assert!(json["timestamp"].is_string());
    }
}
