//! UseCase: WebSocket コネクションの接続
//!
//! 接続直後は `connected` 状態で、まだレジストリには登録されません。
//! 返信用のチャンネルだけを MessagePusher に登録します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// コネクション接続のユースケース
pub struct ConnectSessionUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectSessionUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        tracing::info!("Connection '{}' opened", connection_id);
        self.message_pusher
            .register_connection(connection_id, sender)
            .await;
    }
}
