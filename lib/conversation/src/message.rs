//! Message and utterance types for sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchboard_core::MessageId;

/// Placeholder substituted for non-text utterance segments.
const NON_TEXT_PLACEHOLDER: &str = "[image]";

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User/human message.
    User,
    /// Assistant/model message.
    Assistant,
    /// System message.
    System,
    /// Tool result message.
    Tool,
}

/// A message appended to the session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Message role.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One segment of a mixed-content utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum UtteranceSegment {
    /// Transcribed text.
    Text(String),
    /// A non-text segment, e.g. a camera frame.
    Image,
}

/// A committed user utterance as delivered by the realtime transport.
///
/// The transport delivers either a plain transcript or an ordered list
/// of segments when frames were interleaved with speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UtteranceContent {
    /// A plain transcript.
    Text(String),
    /// Ordered mixed segments.
    Segments(Vec<UtteranceSegment>),
}

impl UtteranceContent {
    /// Normalizes the utterance to a single string.
    ///
    /// Non-text segments collapse to a fixed `"[image]"` placeholder;
    /// segments are joined with newlines in their original order.
    #[must_use]
    pub fn normalize(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Segments(segments) => segments
                .iter()
                .map(|segment| match segment {
                    UtteranceSegment::Text(text) => text.as_str(),
                    UtteranceSegment::Image => NON_TEXT_PLACEHOLDER,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<&str> for UtteranceContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_creation() {
        let msg = Message::new(MessageRole::User, "Hello!");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "Hello!");
    }

    #[test]
    fn plain_text_normalizes_to_itself() {
        let content = UtteranceContent::Text("what are your hours?".to_string());
        assert_eq!(content.normalize(), "what are your hours?");
    }

    #[test]
    fn segments_collapse_images_in_order() {
        let content = UtteranceContent::Segments(vec![
            UtteranceSegment::Text("look at this".to_string()),
            UtteranceSegment::Image,
            UtteranceSegment::Text("what is it?".to_string()),
        ]);
        assert_eq!(content.normalize(), "look at this\n[image]\nwhat is it?");
    }

    #[test]
    fn image_only_utterance() {
        let content = UtteranceContent::Segments(vec![UtteranceSegment::Image]);
        assert_eq!(content.normalize(), "[image]");
    }

    #[test]
    fn message_serde_roundtrip() {
        let msg = Message::new(MessageRole::Assistant, "Here you go.");
        let json = serde_json::to_string(&msg).expect("serialize");
        let parsed: Message = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(msg.id, parsed.id);
        assert_eq!(msg.content, parsed.content);
    }
}
