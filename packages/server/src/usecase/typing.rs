//! UseCase: タイピングインジケーター中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - TypingUseCase::execute() メソッド
//! - タイピング通知の純粋な中継（ストアには何も保存しない）
//!
//! ### なぜこのテストが必要か
//! - 宛先解決の検証：クライアント→管理者、管理者→会話の所有クライアント
//! - 通知が合体（coalesce）されないことを保証（重複排除は行わない）
//!
//! ### どのような状況を想定しているか
//! - 正常系：双方向の typing 通知
//! - エッジケース：管理者不在、conversationId 欠落、連続した typing-start

use std::sync::Arc;

use crate::domain::{AdminRegistry, ConnectionId, MessagePusher, Sender};
use crate::infrastructure::dto::websocket::UserTypingEvent;

/// タイピングインジケーター中継のユースケース
pub struct TypingUseCase {
    registry: Arc<dyn AdminRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl TypingUseCase {
    /// 新しい TypingUseCase を作成
    pub fn new(registry: Arc<dyn AdminRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// タイピング通知を中継する
    ///
    /// 何も保存しない純粋な中継。クライアント発は接続中の管理者へ
    /// `conversationId` 付きで、管理者発はペイロードの `conversationId` が
    /// 指す会話の所有クライアントへ注釈なしで届く。宛先が解決できなければ
    /// 黙って破棄する。
    pub async fn execute(
        &self,
        caller: ConnectionId,
        sender: Sender,
        conversation_id: Option<ConnectionId>,
        is_typing: bool,
    ) {
        match sender {
            Sender::Client => {
                let Some(admin) = self.registry.current_admin().await else {
                    return;
                };
                let event = UserTypingEvent::for_admin(caller, is_typing);
                let json = serde_json::to_string(&event).unwrap();
                if let Err(e) = self.message_pusher.push_to(&admin, &json).await {
                    tracing::warn!("failed to relay typing to admin '{}': {}", admin, e);
                }
            }
            Sender::Admin => {
                let Some(target) = conversation_id else {
                    return;
                };
                let event = UserTypingEvent::for_client(is_typing);
                let json = serde_json::to_string(&event).unwrap();
                if let Err(e) = self.message_pusher.push_to(&target, &json).await {
                    tracing::warn!("failed to relay typing to client '{}': {}", target, e);
                }
            }
        }
    }
}
