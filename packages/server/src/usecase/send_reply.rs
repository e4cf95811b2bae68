//! UseCase: 送信元コネクションへの返信

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher};

/// 返信送信のユースケース
///
/// 返信は送信元のコネクションにのみ届けます。
pub struct SendReplyUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendReplyUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// `json_message` は DTO 層で生成された JSON
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        json_message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher
            .push_to(connection_id, json_message)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_reply_reaches_only_origin() {
        // テスト項目: 返信は送信元コネクションにだけ届く
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let origin = ConnectionId::new("origin".to_string()).unwrap();
        let other = ConnectionId::new("other".to_string()).unwrap();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_connection(origin.clone(), tx1).await;
        pusher.register_connection(other, tx2).await;
        let usecase = SendReplyUseCase::new(pusher);

        // when (操作):
        usecase.execute(&origin, r#"{"type":"message"}"#).await.unwrap();

        // then (期待する結果):
        assert_eq!(rx1.recv().await, Some(r#"{"type":"message"}"#.to_string()));
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reply_to_unknown_connection() {
        let usecase = SendReplyUseCase::new(Arc::new(WebSocketMessagePusher::new()));
        let result = usecase
            .execute(&ConnectionId::new("gone".to_string()).unwrap(), "{}")
            .await;
        assert!(matches!(result, Err(MessagePushError::ConnectionNotFound(_))));
    }
}
