//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectionId, Conversation, Message, Sender};

/// Discriminator for outbound server → client frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "conversations-list")]
    ConversationsList,
    #[serde(rename = "new-conversation")]
    NewConversation,
    #[serde(rename = "message")]
    Message,
    #[serde(rename = "user-typing")]
    UserTyping,
    #[serde(rename = "conversation-updated")]
    ConversationUpdated,
}

/// Inbound caller → server events.
///
/// Malformed or unknown frames fail to parse and are dropped by the handler;
/// a transport disconnect is implicit and has no wire representation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum InboundEvent {
    AdminJoin,
    ClientJoin {
        name: String,
        email: String,
    },
    SendMessage {
        text: String,
        sender: Sender,
        conversation_id: Option<ConnectionId>,
    },
    TypingStart {
        sender: Sender,
        conversation_id: Option<ConnectionId>,
    },
    TypingStop {
        sender: Sender,
        conversation_id: Option<ConnectionId>,
    },
}

/// Full snapshot sent to a joining admin. The only full-state transfer;
/// every other update is a delta.
#[derive(Debug, Serialize)]
pub struct ConversationsListEvent {
    pub r#type: EventType,
    pub conversations: Vec<Conversation>,
}

/// A single conversation record, pushed to the admin as a delta
/// (`new-conversation` or `conversation-updated`).
#[derive(Debug, Serialize)]
pub struct ConversationEvent {
    pub r#type: EventType,
    pub conversation: Conversation,
}

/// One relayed chat message.
///
/// The message fields are flattened to the top level; `conversationId` and
/// `clientName` are present only on admin-bound frames.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub r#type: EventType,
    #[serde(flatten)]
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConnectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

/// Typing indicator relay. `conversationId` is present only on admin-bound
/// frames; the visitor only ever has one conversation, its own.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingEvent {
    pub r#type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConnectionId>,
    pub is_typing: bool,
}
