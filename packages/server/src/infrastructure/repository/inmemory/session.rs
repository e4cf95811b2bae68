//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! HashMap をインメモリのコネクションレジストリとして使用します。
//! プロセスが終了すると内容はすべて失われます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, SessionRepository, UserId};

/// インメモリ Session Repository 実装
///
/// サーバーインスタンスごとに1つ生成されます（グローバル状態は持ちません）。
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    /// Key: connection id, Value: user id
    sessions: Arc<Mutex<HashMap<ConnectionId, UserId>>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn add(&self, connection_id: ConnectionId, user_id: UserId) -> Option<UserId> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(connection_id, user_id)
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<UserId> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(connection_id)
    }

    async fn get(&self, connection_id: &ConnectionId) -> Option<UserId> {
        let sessions = self.sessions.lock().await;
        sessions.get(connection_id).cloned()
    }

    async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
