//! Conversation and message entities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ConnectionId;

/// Which side of the relay authored a message or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Client,
    Admin,
}

/// Conversation lifecycle status.
///
/// Starts as `Active`; becomes `Inactive` through the disconnect grace-period
/// check and never reverts automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Inactive,
}

/// Validation error for message text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageTextError {
    #[error("message text must not be empty")]
    Empty,
}

/// Non-empty message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageText(String);

impl MessageText {
    /// Validate and wrap a message body. Whitespace-only text is rejected.
    pub fn new(text: String) -> Result<Self, MessageTextError> {
        if text.trim().is_empty() {
            return Err(MessageTextError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// One chat message, owned by exactly one conversation.
///
/// Messages are append-only: once in a conversation log they are never
/// mutated, reordered, or removed. The `read` flag is a display concern kept
/// for record-shape parity with the admin UI; the server never toggles it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub text: MessageText,
    pub sender: Sender,
    pub timestamp: i64,
    #[serde(default)]
    pub read: bool,
}

impl Message {
    /// Build a message stamped with the given creation time.
    ///
    /// The id is derived from the creation timestamp (UTC milliseconds),
    /// which is unique enough for a single in-memory log.
    pub fn new(text: MessageText, sender: Sender, timestamp_millis: i64) -> Self {
        Self {
            id: timestamp_millis,
            text,
            sender,
            timestamp: timestamp_millis,
            read: false,
        }
    }
}

/// A visitor's conversation with the admin operator.
///
/// Keyed by the originating visitor's connection identity: one conversation
/// per client connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConnectionId,
    pub client_name: String,
    pub client_email: String,
    pub messages: Vec<Message>,
    pub status: ConversationStatus,
    pub created_at: i64,
}

impl Conversation {
    /// Create an empty active conversation for a newly joined visitor.
    ///
    /// `client_name` and `client_email` are immutable after creation.
    pub fn new(
        id: ConnectionId,
        client_name: String,
        client_email: String,
        created_at_millis: i64,
    ) -> Self {
        Self {
            id,
            client_name,
            client_email,
            messages: Vec::new(),
            status: ConversationStatus::Active,
            created_at: created_at_millis,
        }
    }

    /// Append a message to the log. Insertion order is chronological order.
    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }
}
