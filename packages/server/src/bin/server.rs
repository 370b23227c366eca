//! Madoguchi support-chat relay server.
//!
//! Relays messages, typing indicators, and conversation lifecycle events
//! between anonymous visitors and a single admin operator.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 5000 \
//!     --allow-origin http://localhost:3000 --grace-period-secs 300
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;

use madoguchi_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryAdminRegistry,
        repository::InMemoryConversationStore,
    },
    ui::{AppState, Server},
    usecase::{
        AdminJoinUseCase, ClientJoinUseCase, DisconnectUseCase, SendMessageUseCase, TypingUseCase,
    },
};
use madoguchi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Support-chat relay between visitors and a single admin", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "5000")]
    port: u16,

    /// Seconds a disconnected visitor's conversation stays active before the
    /// inactivity check fires (0 marks it inactive immediately)
    #[arg(long, default_value = "300")]
    grace_period_secs: u64,

    /// Allowed CORS origin (repeatable); omit to allow any origin
    #[arg(long)]
    allow_origin: Vec<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Store / Registry / MessagePusher / Clock
    // 2. UseCases
    // 3. AppState
    // 4. Server

    // 1. Shared state and delivery
    let store = Arc::new(InMemoryConversationStore::new());
    let registry = Arc::new(InMemoryAdminRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let clock = Arc::new(SystemClock);

    // 2. Create UseCases
    let admin_join_usecase = Arc::new(AdminJoinUseCase::new(
        store.clone(),
        registry.clone(),
        message_pusher.clone(),
    ));
    let client_join_usecase = Arc::new(ClientJoinUseCase::new(
        store.clone(),
        registry.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        store.clone(),
        registry.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let typing_usecase = Arc::new(TypingUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        store.clone(),
        registry.clone(),
        message_pusher.clone(),
        clock.clone(),
        Duration::from_secs(args.grace_period_secs),
    ));

    // 3. Create AppState
    let state = AppState {
        admin_join_usecase,
        client_join_usecase,
        send_message_usecase,
        typing_usecase,
        disconnect_usecase,
        message_pusher: message_pusher.clone(),
        conversation_store: store.clone(),
    };

    // 4. Create and run the server
    let server = Server::new(state, args.allow_origin);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
