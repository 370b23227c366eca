//! UseCase layer error types.

use thiserror::Error;

/// Outcome of a `send-message` event that could not be routed.
///
/// Both variants are drop paths: the handler logs them at debug level and
/// does nothing further for the event. Nothing is surfaced to the sender.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("no conversation routes this message")]
    NoRoute,
    #[error("message text must not be empty")]
    EmptyText,
}
