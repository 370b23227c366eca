//! UseCase: クライアント（訪問者）参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ClientJoinUseCase::execute() メソッド
//! - 会話の作成、ウェルカムメッセージの合成、管理者への通知
//!
//! ### なぜこのテストが必要か
//! - ウェルカムメッセージが管理者宛レコードに埋め込まれ、クライアントにのみ
//!   message イベントとして届くことを保証
//! - 同じコネクションでの再 join が既存の会話を上書きすることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：管理者接続中の参加
//! - エッジケース：管理者不在の参加、再 join による上書き

use std::sync::Arc;

use madoguchi_shared::time::Clock;

use crate::domain::{
    AdminRegistry, ConnectionId, Conversation, ConversationStore, Message, MessagePusher,
    MessageText, Sender,
};
use crate::infrastructure::dto::websocket::{ConversationEvent, MessageEvent};

/// 訪問者が会話を開始したときに合成されるウェルカムメッセージの本文
pub const WELCOME_TEXT: &str = "Hello! Thanks for reaching out. I'll get back to you as soon as possible. How can I help you today?";

/// クライアント参加のユースケース
pub struct ClientJoinUseCase {
    store: Arc<dyn ConversationStore>,
    registry: Arc<dyn AdminRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ClientJoinUseCase {
    /// 新しい ClientJoinUseCase を作成
    pub fn new(
        store: Arc<dyn ConversationStore>,
        registry: Arc<dyn AdminRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            registry,
            message_pusher,
            clock,
        }
    }

    /// クライアント参加を実行
    ///
    /// 会話を作成してウェルカムメッセージを追記し、管理者（接続中なら）に
    /// `new-conversation` を、参加クライアントにウェルカムの `message` を送る。
    /// 同じコネクション ID の会話が既に存在する場合は上書きする（元システムの
    /// 挙動）。それまでのメッセージは失われるため警告ログを出す。
    ///
    /// # Returns
    ///
    /// 作成した会話（ウェルカムメッセージを含む）
    pub async fn execute(
        &self,
        conn_id: ConnectionId,
        name: String,
        email: String,
    ) -> Conversation {
        let now = self.clock.now_utc_millis();

        let mut conversation = Conversation::new(conn_id, name, email, now);
        let welcome_text =
            MessageText::new(WELCOME_TEXT.to_string()).expect("welcome text should be non-empty");
        let welcome = Message::new(welcome_text, Sender::Admin, now);
        conversation.append_message(welcome.clone());

        if let Some(displaced) = self.store.create(conversation.clone()).await {
            tracing::warn!(
                "conversation for '{}' recreated, dropping {} earlier message(s)",
                conn_id,
                displaced.messages.len()
            );
        }

        // 管理者へのデルタ。ウェルカムは既にレコードに含まれているため、
        // 別途 message イベントは送らない。
        if let Some(admin) = self.registry.current_admin().await {
            let event = ConversationEvent::new_conversation(conversation.clone());
            let json = serde_json::to_string(&event).unwrap();
            if let Err(e) = self.message_pusher.push_to(&admin, &json).await {
                tracing::warn!("failed to send new-conversation to admin '{}': {}", admin, e);
            }
        }

        let event = MessageEvent::for_client(welcome);
        let json = serde_json::to_string(&event).unwrap();
        if let Err(e) = self.message_pusher.push_to(&conn_id, &json).await {
            tracing::warn!("failed to send welcome message to '{}': {}", conn_id, e);
        }

        conversation
    }
}
