//! Domain layer: entities, value objects, and the interfaces the relay
//! depends on.

mod connection;
mod conversation;
mod error;
pub mod lifecycle;
mod pusher;
mod repository;

pub use connection::ConnectionId;
pub use conversation::{
    Conversation, ConversationStatus, Message, MessageText, MessageTextError, Sender,
};
pub use error::{MessagePushError, StoreError};
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{AdminRegistry, ConversationStore};
