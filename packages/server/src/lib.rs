//! Madoguchi support-chat relay server library.
//!
//! Routes messages, typing indicators, and conversation lifecycle events
//! between many anonymous visitors and a single admin operator over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
