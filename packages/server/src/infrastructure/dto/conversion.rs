//! Construction of outbound DTOs from domain entities.

use crate::domain::{ConnectionId, Conversation, Message};
use crate::infrastructure::dto::websocket as dto;

impl From<Vec<Conversation>> for dto::ConversationsListEvent {
    fn from(conversations: Vec<Conversation>) -> Self {
        Self {
            r#type: dto::EventType::ConversationsList,
            conversations,
        }
    }
}

impl dto::ConversationEvent {
    /// Delta pushed to the admin when a visitor opens a conversation.
    pub fn new_conversation(conversation: Conversation) -> Self {
        Self {
            r#type: dto::EventType::NewConversation,
            conversation,
        }
    }

    /// Delta pushed to the admin when a conversation's status changes.
    pub fn updated(conversation: Conversation) -> Self {
        Self {
            r#type: dto::EventType::ConversationUpdated,
            conversation,
        }
    }
}

impl dto::MessageEvent {
    /// Frame bound for the conversation's visitor: bare message fields.
    pub fn for_client(message: Message) -> Self {
        Self {
            r#type: dto::EventType::Message,
            message,
            conversation_id: None,
            client_name: None,
        }
    }

    /// Frame bound for the admin: annotated with the conversation it belongs
    /// to, and with the visitor's name when the visitor authored it.
    pub fn for_admin(
        message: Message,
        conversation_id: ConnectionId,
        client_name: Option<String>,
    ) -> Self {
        Self {
            r#type: dto::EventType::Message,
            message,
            conversation_id: Some(conversation_id),
            client_name,
        }
    }
}

impl dto::UserTypingEvent {
    /// Typing indicator bound for the admin, annotated with the conversation.
    pub fn for_admin(conversation_id: ConnectionId, is_typing: bool) -> Self {
        Self {
            r#type: dto::EventType::UserTyping,
            conversation_id: Some(conversation_id),
            is_typing,
        }
    }

    /// Typing indicator bound for a visitor; no conversation annotation.
    pub fn for_client(is_typing: bool) -> Self {
        Self {
            r#type: dto::EventType::UserTyping,
            conversation_id: None,
            is_typing,
        }
    }
}
