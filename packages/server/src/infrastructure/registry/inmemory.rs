//! InMemory Admin Registry 実装
//!
//! プロセス全体で高々 1 つの管理者コネクション ID を保持する。
//! コネクションごとの状態はここには持たない（送信チャンネルは
//! MessagePusher が管理する）。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{AdminRegistry, ConnectionId};

/// インメモリ Admin Registry 実装
pub struct InMemoryAdminRegistry {
    admin: Mutex<Option<ConnectionId>>,
}

impl InMemoryAdminRegistry {
    /// 管理者が未登録の状態で InMemoryAdminRegistry を作成
    pub fn new() -> Self {
        Self {
            admin: Mutex::new(None),
        }
    }
}

impl Default for InMemoryAdminRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdminRegistry for InMemoryAdminRegistry {
    async fn set_admin(&self, conn_id: ConnectionId) {
        let mut admin = self.admin.lock().await;
        if let Some(previous) = admin.replace(conn_id) {
            if previous != conn_id {
                tracing::warn!(
                    "admin slot taken over by '{}' (displacing '{}')",
                    conn_id,
                    previous
                );
            }
        } else {
            tracing::debug!("admin slot claimed by '{}'", conn_id);
        }
    }

    async fn clear_admin(&self, conn_id: &ConnectionId) -> bool {
        let mut admin = self.admin.lock().await;
        if admin.as_ref() == Some(conn_id) {
            *admin = None;
            tracing::debug!("admin slot cleared by '{}'", conn_id);
            true
        } else {
            false
        }
    }

    async fn current_admin(&self) -> Option<ConnectionId> {
        let admin = self.admin.lock().await;
        *admin
    }
}
