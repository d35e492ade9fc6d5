//! The session channel boundary.
//!
//! The channel is the outbound side of the realtime model session:
//! messages appended to the transcript and explicit requests for the
//! model to produce a spoken response. Implementations own the
//! transport; the coordinator only sees this trait.

use crate::message::MessageRole;
use async_trait::async_trait;
use std::sync::Mutex;

/// Errors from channel writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The transport rejected or dropped the write.
    WriteFailed { reason: String },
    /// The session is no longer connected.
    Disconnected,
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WriteFailed { reason } => write!(f, "channel write failed: {reason}"),
            Self::Disconnected => write!(f, "session channel disconnected"),
        }
    }
}

impl std::error::Error for ChannelError {}

/// Outbound side of a realtime model session.
#[async_trait]
pub trait SessionChannel: Send + Sync {
    /// Appends a message to the session transcript.
    async fn append_message(&self, role: MessageRole, content: &str) -> Result<(), ChannelError>;

    /// Asks the model to produce a response from the current transcript.
    async fn request_response(&self) -> Result<(), ChannelError>;
}

/// A recorded channel write, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedWrite {
    /// An appended message.
    Message { role: MessageRole, content: String },
    /// A response request.
    ResponseRequest,
}

/// In-memory channel that records writes, for tests.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    writes: Mutex<Vec<RecordedWrite>>,
    /// If true, every write fails.
    pub fail_writes: bool,
}

impl RecordingChannel {
    /// Creates an empty recording channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel whose writes all fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    /// Returns a snapshot of recorded writes.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().expect("writes lock").clone()
    }

    /// Returns how many response requests were recorded.
    #[must_use]
    pub fn response_requests(&self) -> usize {
        self.writes()
            .iter()
            .filter(|w| matches!(w, RecordedWrite::ResponseRequest))
            .count()
    }
}

#[async_trait]
impl SessionChannel for RecordingChannel {
    async fn append_message(&self, role: MessageRole, content: &str) -> Result<(), ChannelError> {
        if self.fail_writes {
            return Err(ChannelError::Disconnected);
        }
        self.writes
            .lock()
            .expect("writes lock")
            .push(RecordedWrite::Message {
                role,
                content: content.to_string(),
            });
        Ok(())
    }

    async fn request_response(&self) -> Result<(), ChannelError> {
        if self.fail_writes {
            return Err(ChannelError::Disconnected);
        }
        self.writes
            .lock()
            .expect("writes lock")
            .push(RecordedWrite::ResponseRequest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_channel_captures_writes() {
        let channel = RecordingChannel::new();
        channel
            .append_message(MessageRole::System, "hello")
            .await
            .unwrap();
        channel.request_response().await.unwrap();

        let writes = channel.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(channel.response_requests(), 1);
    }

    #[tokio::test]
    async fn failing_channel_rejects_writes() {
        let channel = RecordingChannel::failing();
        let result = channel.append_message(MessageRole::User, "hi").await;
        assert_eq!(result, Err(ChannelError::Disconnected));
    }
}
