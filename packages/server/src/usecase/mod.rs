//! UseCase layer: the relay's event-handling core.
//!
//! Each inbound event is handled by one usecase that validates it, mutates
//! the conversation store, and determines the exact set of outbound
//! recipients. Handlers run to completion per event; an unroutable event is
//! contained locally and never fails the process.

mod admin_join;
mod client_join;
mod disconnect;
mod error;
mod send_message;
mod typing;

pub use admin_join::AdminJoinUseCase;
pub use client_join::{ClientJoinUseCase, WELCOME_TEXT};
pub use disconnect::{DisconnectOutcome, DisconnectUseCase};
pub use error::SendMessageError;
pub use send_message::SendMessageUseCase;
pub use typing::TypingUseCase;
