//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use madoguchi_shared::time::{get_utc_timestamp, timestamp_to_rfc3339};

use crate::domain::Conversation;

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": timestamp_to_rfc3339(get_utc_timestamp()),
    }))
}

/// Debug endpoint to get the current conversation snapshot (for testing purposes)
pub async fn debug_conversations(State(state): State<Arc<AppState>>) -> Json<Vec<Conversation>> {
    Json(state.conversation_store.all().await)
}
