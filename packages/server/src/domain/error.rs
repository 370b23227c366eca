//! Domain-level error types.

use thiserror::Error;

/// Errors from the conversation store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no conversation found for connection '{0}'")]
    ConversationNotFound(String),
}

/// Errors from message delivery.
///
/// Delivery is fire-and-forget: callers log these and move on, they are
/// never surfaced to the sending party.
#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
