//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 宛先会話の解決、メッセージログへの追記、送信者ごとのファンアウト
//!
//! ### なぜこのテストが必要か
//! - ルーティングの非対称性の検証：管理者はペイロードの conversationId で
//!   任意の会話を指定できるが、クライアントは自分の会話にしか投稿できない
//! - 管理者不在時もメッセージが保存されることを保証（後から join した
//!   管理者がスナップショットで受け取る）
//!
//! ### どのような状況を想定しているか
//! - 正常系：クライアント→管理者、管理者→クライアントの双方向
//! - 異常系：経路なし（会話が存在しない、conversationId 欠落）、空テキスト
//! - エッジケース：管理者不在、クライアントによる他会話の指定

use std::sync::Arc;

use madoguchi_shared::time::Clock;

use crate::domain::{
    AdminRegistry, ConnectionId, ConversationStore, Message, MessagePusher, MessageText, Sender,
};
use crate::infrastructure::dto::websocket::MessageEvent;

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    store: Arc<dyn ConversationStore>,
    registry: Arc<dyn AdminRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
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

    /// メッセージ送信を実行
    ///
    /// 宛先会話を解決してメッセージを追記し、送信者に応じてファンアウトする：
    ///
    /// - 送信者が管理者：ペイロードの `conversationId` が宛先。会話を所有する
    ///   クライアントに配送し、管理者自身には `conversationId` 注釈付きで
    ///   エコーする。
    /// - 送信者がクライアント：宛先は常に自分自身の会話。接続中の管理者に
    ///   `conversationId` と `clientName` 注釈付きで配送し、クライアント
    ///   自身にはエコーする。管理者不在なら配送は no-op（保存はされる）。
    ///
    /// # Arguments
    ///
    /// * `caller` - イベントを送ってきたコネクションの ID
    /// * `text` - メッセージ本文
    /// * `sender` - ペイロードで申告された送信者種別
    /// * `conversation_id` - 管理者が宛先に指定した会話 ID（クライアントでは無視）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 追記したメッセージ
    /// * `Err(SendMessageError)` - 経路なし・空テキスト（黙って破棄される）
    pub async fn execute(
        &self,
        caller: ConnectionId,
        text: String,
        sender: Sender,
        conversation_id: Option<ConnectionId>,
    ) -> Result<Message, SendMessageError> {
        let target = match sender {
            Sender::Admin => conversation_id.ok_or(SendMessageError::NoRoute)?,
            // クライアントは自分の会話にしか投稿できない。ペイロードの
            // conversationId は意図的に無視する。
            Sender::Client => caller,
        };

        let text = MessageText::new(text).map_err(|_| SendMessageError::EmptyText)?;
        let message = Message::new(text, sender, self.clock.now_utc_millis());

        self.store
            .append_message(&target, message.clone())
            .await
            .map_err(|_| SendMessageError::NoRoute)?;

        match sender {
            Sender::Admin => {
                let to_client = MessageEvent::for_client(message.clone());
                let json = serde_json::to_string(&to_client).unwrap();
                if let Err(e) = self.message_pusher.push_to(&target, &json).await {
                    tracing::warn!("failed to deliver message to client '{}': {}", target, e);
                }

                let echo = MessageEvent::for_admin(message.clone(), target, None);
                let json = serde_json::to_string(&echo).unwrap();
                if let Err(e) = self.message_pusher.push_to(&caller, &json).await {
                    tracing::warn!("failed to echo message to admin '{}': {}", caller, e);
                }
            }
            Sender::Client => {
                if let Some(admin) = self.registry.current_admin().await {
                    let client_name = self
                        .store
                        .get(&target)
                        .await
                        .map(|conversation| conversation.client_name);
                    let to_admin = MessageEvent::for_admin(message.clone(), target, client_name);
                    let json = serde_json::to_string(&to_admin).unwrap();
                    if let Err(e) = self.message_pusher.push_to(&admin, &json).await {
                        tracing::warn!("failed to deliver message to admin '{}': {}", admin, e);
                    }
                }

                let echo = MessageEvent::for_client(message.clone());
                let json = serde_json::to_string(&echo).unwrap();
                if let Err(e) = self.message_pusher.push_to(&caller, &json).await {
                    tracing::warn!("failed to echo message to client '{}': {}", caller, e);
                }
            }
        }

        Ok(message)
    }
}
