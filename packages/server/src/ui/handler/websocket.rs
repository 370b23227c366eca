//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::InboundEvent,
    usecase::{DisconnectOutcome, SendMessageError},
};

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Assign a fresh server-side identity to this transport session.
    // Identities are never reused; a reconnecting visitor gets a new one
    // and therefore a new conversation.
    let conn_id = ConnectionId::new();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    state.message_pusher.register_client(conn_id, tx).await;

    tracing::info!("connection '{}' established", conn_id);

    ws.on_upgrade(move |socket| handle_socket(socket, state, conn_id, rx))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This is the outbound half of a connection: events routed to this
/// connection by the usecases arrive on the channel and are written to the
/// socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this connection
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    conn_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<InboundEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            // Malformed or unknown events are dropped, never
                            // surfaced to the sender.
                            tracing::warn!(
                                "failed to parse event from '{}': {}",
                                conn_id,
                                e
                            );
                            continue;
                        }
                    };
                    dispatch_event(&state_clone, conn_id, event).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("connection '{}' requested close", conn_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive messages from the relay and send to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let outcome = state.disconnect_usecase.execute(conn_id).await;
    state.message_pusher.unregister_client(&conn_id).await;

    match outcome {
        DisconnectOutcome::AdminCleared => {
            tracing::info!("admin '{}' disconnected, slot cleared", conn_id);
        }
        DisconnectOutcome::InactivityCheckScheduled => {
            tracing::info!(
                "client '{}' disconnected, inactivity check scheduled",
                conn_id
            );
        }
        DisconnectOutcome::Untracked => {
            tracing::info!("connection '{}' disconnected", conn_id);
        }
    }
}

/// Route one inbound event to its usecase.
async fn dispatch_event(state: &Arc<AppState>, conn_id: ConnectionId, event: InboundEvent) {
    match event {
        InboundEvent::AdminJoin => {
            let conversations = state.admin_join_usecase.execute(conn_id).await;
            tracing::info!(
                "admin '{}' joined, sent snapshot of {} conversation(s)",
                conn_id,
                conversations.len()
            );
        }
        InboundEvent::ClientJoin { name, email } => {
            let conversation = state.client_join_usecase.execute(conn_id, name, email).await;
            tracing::info!(
                "client '{}' started conversation '{}'",
                conversation.client_name,
                conn_id
            );
        }
        InboundEvent::SendMessage {
            text,
            sender,
            conversation_id,
        } => {
            match state
                .send_message_usecase
                .execute(conn_id, text, sender, conversation_id)
                .await
            {
                Ok(_) => {}
                Err(SendMessageError::NoRoute) => {
                    tracing::debug!("dropped unroutable message from '{}'", conn_id);
                }
                Err(SendMessageError::EmptyText) => {
                    tracing::debug!("dropped empty message from '{}'", conn_id);
                }
            }
        }
        InboundEvent::TypingStart {
            sender,
            conversation_id,
        } => {
            state
                .typing_usecase
                .execute(conn_id, sender, conversation_id, true)
                .await;
        }
        InboundEvent::TypingStop {
            sender,
            conversation_id,
        } => {
            state
                .typing_usecase
                .execute(conn_id, sender, conversation_id, false)
                .await;
        }
    }
}
