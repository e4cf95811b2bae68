//! UseCase: WebSocket コネクションの切断
//!
//! `disconnected` は終端状態です。レジストリのエントリと返信用チャンネルを削除します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, SessionRepository, UserId};

/// コネクション切断のユースケース
pub struct DisconnectSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Returns the user id the connection had joined as, if it had joined
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<UserId> {
        self.message_pusher
            .unregister_connection(connection_id)
            .await;
        let removed = self.repository.remove(connection_id).await;

        match &removed {
            Some(user_id) => tracing::info!(
                "Connection '{}' ({}) disconnected and removed from registry",
                connection_id,
                user_id
            ),
            None => tracing::info!("Connection '{}' disconnected before joining", connection_id),
        }

        removed
    }
}
