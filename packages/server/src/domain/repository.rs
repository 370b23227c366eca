//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, Conversation, ConversationStatus, Message, StoreError};

/// Conversation Store trait
///
/// 会話 ID（= 発信クライアントのコネクション ID）から会話レコードへの
/// マッピング。このプロセスで唯一の正式な状態であり、永続化はしない。
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// 会話を登録する
    ///
    /// 同じ ID の会話が既に存在する場合は上書きし、置き換えられた
    /// 会話レコードを返す（呼び出し側が警告ログを出すため）。
    /// 上書きされた ID は挿入順の中で元の位置を保つ。
    async fn create(&self, conversation: Conversation) -> Option<Conversation>;

    /// 会話のスナップショットを取得
    async fn get(&self, id: &ConnectionId) -> Option<Conversation>;

    /// 会話のメッセージログに追記する
    ///
    /// 会話が存在しない場合はエラーを返す。呼び出し側はこれを
    /// 「経路なし」として黙って破棄する（仕様として文書化された no-op）。
    async fn append_message(&self, id: &ConnectionId, message: Message)
    -> Result<(), StoreError>;

    /// 会話のステータスを変更し、更新後のスナップショットを返す
    async fn set_status(
        &self,
        id: &ConnectionId,
        status: ConversationStatus,
    ) -> Result<Conversation, StoreError>;

    /// 全ての会話のスナップショットを挿入順で取得
    async fn all(&self) -> Vec<Conversation>;
}

/// Admin Registry trait
///
/// プロセス全体で高々 1 つの管理者コネクションを追跡する。
/// 認証は行わない：`admin-join` を送った任意のコネクションが管理者となり、
/// 以前の管理者を（通知なしで）置き換える。これは元システムの挙動を
/// 文書化された仕様として保存したもの。
#[async_trait]
pub trait AdminRegistry: Send + Sync {
    /// 管理者スロットを無条件に上書きする
    async fn set_admin(&self, conn_id: ConnectionId);

    /// `conn_id` が現在の管理者と一致する場合のみスロットをクリアする
    ///
    /// 古い切断イベントが新しい管理者のスロットをクリアしてしまう
    /// レースを防ぐガード。クリアした場合 `true` を返す。
    async fn clear_admin(&self, conn_id: &ConnectionId) -> bool;

    /// 現在の管理者コネクション ID を取得
    async fn current_admin(&self) -> Option<ConnectionId>;
}
