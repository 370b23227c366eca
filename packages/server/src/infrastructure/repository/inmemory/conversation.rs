//! InMemory Conversation Store 実装
//!
//! ドメイン層が定義する ConversationStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用し、挿入順を別途保持します。
//! プロセス終了とともに全ての会話とメッセージが破棄されます（意図的に
//! 永続化しない設計）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Conversation, ConversationStatus, ConversationStore, Message, StoreError,
};

struct StoreInner {
    conversations: HashMap<ConnectionId, Conversation>,
    /// スナップショット用の挿入順。上書きされた ID は元の位置を保つ。
    order: Vec<ConnectionId>,
}

/// インメモリ Conversation Store 実装
pub struct InMemoryConversationStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryConversationStore {
    /// 新しい空の InMemoryConversationStore を作成
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                conversations: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, conversation: Conversation) -> Option<Conversation> {
        let mut inner = self.inner.lock().await;
        let id = conversation.id;
        let displaced = inner.conversations.insert(id, conversation);
        if displaced.is_none() {
            inner.order.push(id);
        }
        displaced
    }

    async fn get(&self, id: &ConnectionId) -> Option<Conversation> {
        let inner = self.inner.lock().await;
        inner.conversations.get(id).cloned()
    }

    async fn append_message(
        &self,
        id: &ConnectionId,
        message: Message,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.conversations.get_mut(id) {
            Some(conversation) => {
                conversation.append_message(message);
                Ok(())
            }
            None => Err(StoreError::ConversationNotFound(id.to_string())),
        }
    }

    async fn set_status(
        &self,
        id: &ConnectionId,
        status: ConversationStatus,
    ) -> Result<Conversation, StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.conversations.get_mut(id) {
            Some(conversation) => {
                conversation.status = status;
                Ok(conversation.clone())
            }
            None => Err(StoreError::ConversationNotFound(id.to_string())),
        }
    }

    async fn all(&self) -> Vec<Conversation> {
        let inner = self.inner.lock().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.conversations.get(id))
            .cloned()
            .collect()
    }
}
