//! UseCase: 切断処理と非アクティブ化の猶予期間
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() / expire_if_idle() メソッド
//! - 管理者スロットのガード付きクリアと、会話の非アクティブ化チェック
//!
//! ### なぜこのテストが必要か
//! - 古い切断イベントが新しい管理者のスロットをクリアしないことを保証
//! - 猶予期間の再チェック方式の検証：タイマー発火時に状態を読み直し、
//!   猶予期間内にメッセージがあれば会話を active のまま残す
//!
//! ### どのような状況を想定しているか
//! - 正常系：管理者切断、放置された会話の非アクティブ化
//! - エッジケース：猶予期間内の活動、既に inactive の会話、会話なしの切断

use std::sync::Arc;
use std::time::Duration;

use madoguchi_shared::time::Clock;

use crate::domain::{
    AdminRegistry, ConnectionId, ConversationStatus, ConversationStore, MessagePusher, lifecycle,
};
use crate::infrastructure::dto::websocket::ConversationEvent;

/// 切断処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// 切断したのは現在の管理者で、スロットをクリアした
    AdminCleared,
    /// 会話を持つクライアントの切断。非アクティブ化チェックを予約した
    InactivityCheckScheduled,
    /// 管理者でも会話の所有者でもないコネクションの切断
    Untracked,
}

/// 切断のユースケース
///
/// タイマーはキャンセルしない：発火時に `expire_if_idle` が状態を読み直し、
/// 猶予期間内に活動があった会話には何もしない（re-check-at-fire 方式）。
/// 再接続は新しい会話を作るため、タイマーハンドルを会話と一緒に管理する
/// 必要はない。
#[derive(Clone)]
pub struct DisconnectUseCase {
    store: Arc<dyn ConversationStore>,
    registry: Arc<dyn AdminRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    grace_period: Duration,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    ///
    /// `grace_period` が 0 の場合、チェックは即座に発火し、切断と同時に
    /// 非アクティブ化される（immediate ポリシーと等価）。
    pub fn new(
        store: Arc<dyn ConversationStore>,
        registry: Arc<dyn AdminRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        grace_period: Duration,
    ) -> Self {
        Self {
            store,
            registry,
            message_pusher,
            clock,
            grace_period,
        }
    }

    /// 切断を処理する
    ///
    /// 現在の管理者の切断ならスロットをクリアする（ガード付き：古い切断
    /// イベントは新しい管理者のスロットに触れない）。会話を持つクライアント
    /// の切断なら猶予期間後の非アクティブ化チェックを予約する。
    pub async fn execute(&self, conn_id: ConnectionId) -> DisconnectOutcome {
        if self.registry.clear_admin(&conn_id).await {
            return DisconnectOutcome::AdminCleared;
        }

        if self.store.get(&conn_id).await.is_some() {
            self.schedule_inactivity_check(conn_id);
            return DisconnectOutcome::InactivityCheckScheduled;
        }

        DisconnectOutcome::Untracked
    }

    /// 猶予期間後の非アクティブ化チェックを予約する
    fn schedule_inactivity_check(&self, conn_id: ConnectionId) {
        let usecase = self.clone();
        let grace = self.grace_period;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            usecase.expire_if_idle(conn_id).await;
        });
    }

    /// タイマー発火時の再チェック
    ///
    /// 会話を読み直し、まだ active で猶予期間内にメッセージがなければ
    /// `inactive` にして、その時点で接続中の管理者に `conversation-updated`
    /// を送る。それ以外は何もしない。
    pub async fn expire_if_idle(&self, conn_id: ConnectionId) {
        let Some(conversation) = self.store.get(&conn_id).await else {
            return;
        };

        let fired_at = self.clock.now_utc_millis();
        let grace_millis = self.grace_period.as_millis() as i64;
        if !lifecycle::should_mark_inactive(&conversation, fired_at, grace_millis) {
            tracing::debug!(
                "conversation '{}' saw activity during grace period, leaving active",
                conn_id
            );
            return;
        }

        match self
            .store
            .set_status(&conn_id, ConversationStatus::Inactive)
            .await
        {
            Ok(updated) => {
                tracing::info!("conversation '{}' marked inactive", conn_id);
                if let Some(admin) = self.registry.current_admin().await {
                    let event = ConversationEvent::updated(updated);
                    let json = serde_json::to_string(&event).unwrap();
                    if let Err(e) = self.message_pusher.push_to(&admin, &json).await {
                        tracing::warn!(
                            "failed to send conversation-updated to admin '{}': {}",
                            admin,
                            e
                        );
                    }
                }
            }
            Err(e) => {
                tracing::warn!("failed to mark conversation '{}' inactive: {}", conn_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madoguchi_shared::time::FixedClock;
    use tokio::sync::mpsc;

    use crate::domain::{Conversation, Message, MessageText, Sender};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::registry::InMemoryAdminRegistry;
    use crate::infrastructure::repository::InMemoryConversationStore;

    const NOW: i64 = 10_000_000;
    const GRACE: Duration = Duration::from_secs(300);

    struct TestContext {
        store: Arc<InMemoryConversationStore>,
        registry: Arc<InMemoryAdminRegistry>,
        pusher: Arc<WebSocketMessagePusher>,
        usecase: DisconnectUseCase,
    }

    fn create_test_context() -> TestContext {
        let store = Arc::new(InMemoryConversationStore::new());
        let registry = Arc::new(InMemoryAdminRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(
            store.clone(),
            registry.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(NOW)),
            GRACE,
        );
        TestContext {
            store,
            registry,
            pusher,
            usecase,
        }
    }

    async fn connect(ctx: &TestContext) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new();
        ctx.pusher.register_client(id, tx).await;
        (id, rx)
    }

    /// 最後のメッセージが `last_message_at` 時点の会話を登録する
    async fn join_client_with_message(ctx: &TestContext, id: ConnectionId, last_message_at: i64) {
        let mut conversation = Conversation::new(
            id,
            "Bob".to_string(),
            "b@x.com".to_string(),
            last_message_at,
        );
        conversation.append_message(Message::new(
            MessageText::new("hello".to_string()).unwrap(),
            Sender::Client,
            last_message_at,
        ));
        ctx.store.create(conversation).await;
    }

    #[tokio::test]
    async fn test_admin_disconnect_clears_slot() {
        // テスト項目: 現在の管理者の切断でスロットがクリアされる
        // given (前提条件):
        let ctx = create_test_context();
        let admin = ConnectionId::new();
        ctx.registry.set_admin(admin).await;

        // when (操作):
        let outcome = ctx.usecase.execute(admin).await;

        // then (期待する結果):
        assert_eq!(outcome, DisconnectOutcome::AdminCleared);
        assert_eq!(ctx.registry.current_admin().await, None);
    }

    #[tokio::test]
    async fn test_stale_admin_disconnect_does_not_clear_newer_admin() {
        // テスト項目: 置き換えられた管理者の遅れた切断が新しい管理者の
        //             スロットをクリアしない
        // given (前提条件):
        let ctx = create_test_context();
        let stale = ConnectionId::new();
        let current = ConnectionId::new();
        ctx.registry.set_admin(stale).await;
        ctx.registry.set_admin(current).await;

        // when (操作):
        let outcome = ctx.usecase.execute(stale).await;

        // then (期待する結果):
        assert_eq!(outcome, DisconnectOutcome::Untracked);
        assert_eq!(ctx.registry.current_admin().await, Some(current));
    }

    #[tokio::test]
    async fn test_client_disconnect_schedules_inactivity_check() {
        // テスト項目: 会話を持つクライアントの切断でチェックが予約され、
        //             ステータスは即座には変わらない
        // given (前提条件):
        let ctx = create_test_context();
        let client = ConnectionId::new();
        join_client_with_message(&ctx, client, NOW - 1_000).await;

        // when (操作):
        let outcome = ctx.usecase.execute(client).await;

        // then (期待する結果):
        assert_eq!(outcome, DisconnectOutcome::InactivityCheckScheduled);
        assert_eq!(
            ctx.store.get(&client).await.unwrap().status,
            ConversationStatus::Active
        );
    }

    #[tokio::test]
    async fn test_disconnect_without_conversation_is_untracked() {
        // テスト項目: 会話を持たないコネクションの切断は何も予約しない
        // given (前提条件):
        let ctx = create_test_context();

        // when (操作):
        let outcome = ctx.usecase.execute(ConnectionId::new()).await;

        // then (期待する結果):
        assert_eq!(outcome, DisconnectOutcome::Untracked);
    }

    #[tokio::test]
    async fn test_expire_if_idle_marks_inactive_and_notifies_admin() {
        // テスト項目: 猶予期間内にメッセージがない会話が inactive になり、
        //             管理者に conversation-updated が届く
        // given (前提条件):
        let ctx = create_test_context();
        let (admin, mut admin_rx) = connect(&ctx).await;
        ctx.registry.set_admin(admin).await;
        let client = ConnectionId::new();
        // 最後のメッセージは猶予期間のはるか前
        join_client_with_message(&ctx, client, NOW - 2 * GRACE.as_millis() as i64).await;

        // when (操作):
        ctx.usecase.expire_if_idle(client).await;

        // then (期待する結果):
        assert_eq!(
            ctx.store.get(&client).await.unwrap().status,
            ConversationStatus::Inactive
        );
        let json: serde_json::Value =
            serde_json::from_str(&admin_rx.recv().await.unwrap()).unwrap();
        assert_eq!(json["type"], "conversation-updated");
        assert_eq!(json["conversation"]["status"], "inactive");
    }

    #[tokio::test]
    async fn test_expire_if_idle_spares_recently_active_conversation() {
        // テスト項目: 猶予期間内にメッセージがある会話は active のまま残る
        // given (前提条件):
        let ctx = create_test_context();
        let (admin, mut admin_rx) = connect(&ctx).await;
        ctx.registry.set_admin(admin).await;
        let client = ConnectionId::new();
        // 猶予期間内に活動があった（短い再接続など）
        join_client_with_message(&ctx, client, NOW - 1_000).await;

        // when (操作):
        ctx.usecase.expire_if_idle(client).await;

        // then (期待する結果):
        assert_eq!(
            ctx.store.get(&client).await.unwrap().status,
            ConversationStatus::Active
        );
        assert!(admin_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_expire_if_idle_skips_already_inactive_conversation() {
        // テスト項目: 既に inactive の会話には再通知しない
        // given (前提条件):
        let ctx = create_test_context();
        let (admin, mut admin_rx) = connect(&ctx).await;
        ctx.registry.set_admin(admin).await;
        let client = ConnectionId::new();
        join_client_with_message(&ctx, client, NOW - 2 * GRACE.as_millis() as i64).await;
        ctx.store
            .set_status(&client, ConversationStatus::Inactive)
            .await
            .unwrap();

        // when (操作):
        ctx.usecase.expire_if_idle(client).await;

        // then (期待する結果):
        assert!(admin_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_expire_if_idle_without_conversation_is_noop() {
        // テスト項目: 会話が存在しない場合のチェックは何もしない
        // given (前提条件):
        let ctx = create_test_context();

        // when (操作): パニックせず完了すること
        ctx.usecase.expire_if_idle(ConnectionId::new()).await;

        // then (期待する結果):
        assert!(ctx.store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_expire_notifies_admin_connected_at_fire_time() {
        // テスト項目: 通知はチェック予約時ではなく発火時点の管理者に届く
        // given (前提条件):
        let ctx = create_test_context();
        let client = ConnectionId::new();
        join_client_with_message(&ctx, client, NOW - 2 * GRACE.as_millis() as i64).await;

        // 発火前に新しい管理者が join する
        let (late_admin, mut late_admin_rx) = connect(&ctx).await;
        ctx.registry.set_admin(late_admin).await;

        // when (操作):
        ctx.usecase.expire_if_idle(client).await;

        // then (期待する結果):
        let json: serde_json::Value =
            serde_json::from_str(&late_admin_rx.recv().await.unwrap()).unwrap();
        assert_eq!(json["type"], "conversation-updated");
    }
}
