//! MessagePusher trait 定義
//!
//! WebSocket コネクションへの送信を抽象化します。
//! 返信は常に送信元のコネクションにのみ届けられ、ブロードキャストはしません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// Channel drained by a connection's writer task
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクションの送信チャンネルを登録
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// コネクションの送信チャンネルを削除
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 特定のコネクションにメッセージを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
