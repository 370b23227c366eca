mod http;
mod websocket;

pub use http::{debug_conversations, health_check};
pub use websocket::websocket_handler;
