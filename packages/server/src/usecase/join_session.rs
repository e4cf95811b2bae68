//! UseCase: join イベントの処理
//!
//! ### どのような状況を想定しているか
//! - 正常系：user_id を指定して join
//! - エッジケース：user_id なしの join（コネクション ID を user_id として使う）
//! - エッジケース：同じコネクションでの再 join（エントリは1つのまま）

use std::sync::Arc;

use crate::domain::{ConnectionId, SessionRepository, UserId};

/// join のユースケース
pub struct JoinSessionUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl JoinSessionUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Move the connection to the `joined` state.
    ///
    /// Without a user id the connection's own identifier is used.
    pub async fn execute(&self, connection_id: ConnectionId, user_id: Option<UserId>) -> UserId {
        let user_id = user_id.unwrap_or_else(|| UserId::from_connection(&connection_id));

        match self
            .repository
            .add(connection_id.clone(), user_id.clone())
            .await
        {
            Some(previous) => tracing::info!(
                "Connection '{}' re-joined as '{}' (was '{}')",
                connection_id,
                user_id,
                previous
            ),
            None => tracing::info!("Connection '{}' joined as '{}'", connection_id, user_id),
        }

        user_id
    }

    /// User id to relay a message under.
    ///
    /// Order: the id carried by the event, the id the connection joined as,
    /// the connection's own identifier.
    pub async fn resolve_user(
        &self,
        connection_id: &ConnectionId,
        event_user_id: Option<UserId>,
    ) -> UserId {
        if let Some(user_id) = event_user_id {
            return user_id;
        }
        match self.repository.get(connection_id).await {
            Some(user_id) => user_id,
            None => UserId::from_connection(connection_id),
        }
    }
}
