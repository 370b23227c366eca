//! MessagePusher trait 定義
//!
//! ドメイン層が必要とするメッセージ配信のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// クライアントへの送信チャンネル
///
/// WebSocket の生成は UI 層で行われ、生成された sender がここに登録される。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 接続中のコネクションへのメッセージ配信を抽象化する。
/// 配信は fire-and-forget（at-most-once）で、失敗は呼び出し側でログに
/// 記録されるのみで送信者には通知されない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクションの送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// コネクションの送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定のコネクションにメッセージを送信
    async fn push_to(&self, client_id: &ConnectionId, content: &str)
    -> Result<(), MessagePushError>;

    /// 複数のコネクションにメッセージを送信
    ///
    /// トランスポートとして提供されるが、このリレーのルーティング規則は
    /// 常に宛先指定の送信のみを使う。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
