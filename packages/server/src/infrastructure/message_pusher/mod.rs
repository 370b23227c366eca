mod websocket;

pub use websocket::WebSocketMessagePusher;
