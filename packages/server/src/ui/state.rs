//! Shared application state handed to the axum handlers.

use std::sync::Arc;

use crate::domain::{ConversationStore, MessagePusher};
use crate::usecase::{
    AdminJoinUseCase, ClientJoinUseCase, DisconnectUseCase, SendMessageUseCase, TypingUseCase,
};

/// Shared application state
pub struct AppState {
    /// AdminJoinUseCase（管理者接続のユースケース）
    pub admin_join_usecase: Arc<AdminJoinUseCase>,
    /// ClientJoinUseCase（クライアント参加のユースケース）
    pub client_join_usecase: Arc<ClientJoinUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// TypingUseCase（タイピング通知中継のユースケース）
    pub typing_usecase: Arc<TypingUseCase>,
    /// DisconnectUseCase（切断処理のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// 接続チャンネルの登録・解除と配送を担う MessagePusher
    pub message_pusher: Arc<dyn MessagePusher>,
    /// デバッグエンドポイント用のストアハンドル
    pub conversation_store: Arc<dyn ConversationStore>,
}
