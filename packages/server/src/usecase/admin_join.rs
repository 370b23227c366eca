//! UseCase: 管理者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AdminJoinUseCase::execute() メソッド
//! - 管理者スロットの登録と全会話スナップショットの送信
//!
//! ### なぜこのテストが必要か
//! - 管理者への全状態転送はこのイベントだけで行われる（他は全てデルタ）
//! - 新しい管理者が以前の管理者を置き換えることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：スナップショット送信
//! - エッジケース：会話が 0 件の場合、送信失敗時

use std::sync::Arc;

use crate::domain::{AdminRegistry, ConnectionId, Conversation, ConversationStore, MessagePusher};
use crate::infrastructure::dto::websocket::ConversationsListEvent;

/// 管理者接続のユースケース
pub struct AdminJoinUseCase {
    store: Arc<dyn ConversationStore>,
    registry: Arc<dyn AdminRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl AdminJoinUseCase {
    /// 新しい AdminJoinUseCase を作成
    pub fn new(
        store: Arc<dyn ConversationStore>,
        registry: Arc<dyn AdminRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            store,
            registry,
            message_pusher,
        }
    }

    /// 管理者接続を実行
    ///
    /// 管理者スロットを上書きし、全会話のスナップショットを
    /// `conversations-list` として接続元に送信する。
    ///
    /// # Returns
    ///
    /// 送信したスナップショット（挿入順）
    pub async fn execute(&self, conn_id: ConnectionId) -> Vec<Conversation> {
        self.registry.set_admin(conn_id).await;

        let conversations = self.store.all().await;
        let event = ConversationsListEvent::from(conversations.clone());
        let json = serde_json::to_string(&event).unwrap();
        if let Err(e) = self.message_pusher.push_to(&conn_id, &json).await {
            tracing::warn!("failed to send conversations-list to '{}': {}", conn_id, e);
        }

        conversations
    }
}
