//! UseCase: チャットメッセージの中継
//!
//! HTTP の POST /api/chat と WebSocket の message イベントの両方から使われます。
//!
//! ### どのような状況を想定しているか
//! - 正常系：バックエンドの response をそのまま返す
//! - 異常系：バックエンドに到達できない・タイムアウト・不正な出力
//! - エッジケース：バックエンドは成功したが response がない

use std::sync::Arc;

use crate::domain::{
    Backend, BackendError, BackendOperation, BackendPayload, MessageContent, UserId,
};

/// Result of relaying one chat message
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /// The backend answered; `success` is forwarded verbatim
    Answered {
        response: String,
        success: Option<bool>,
    },
    /// The backend could not answer; callers substitute fallback content
    Unavailable(BackendError),
}

/// チャットメッセージ中継のユースケース
pub struct RelayMessageUseCase {
    backend: Arc<dyn Backend>,
}

impl RelayMessageUseCase {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// メッセージをバックエンドに転送する
    ///
    /// Never fails: backend errors are logged and returned as
    /// [`RelayOutcome::Unavailable`].
    pub async fn execute(&self, content: MessageContent, user_id: UserId) -> RelayOutcome {
        tracing::debug!(
            "Relaying message from '{}' ({} chars)",
            user_id,
            content.char_len()
        );

        let payload = BackendPayload::chat(&content, &user_id);
        let result = self
            .backend
            .invoke(BackendOperation::Chat, payload)
            .await
            .and_then(|reply| match reply.response {
                Some(response) => Ok(RelayOutcome::Answered {
                    response,
                    success: reply.success,
                }),
                None => Err(BackendError::MalformedOutput(
                    reply
                        .error
                        .unwrap_or_else(|| "reply has no 'response' field".to_string()),
                )),
            });

        match result {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(
                    operation = %BackendOperation::Chat,
                    user_id = %user_id,
                    kind = error.kind(),
                    "Backend call failed: {}",
                    error
                );
                RelayOutcome::Unavailable(error)
            }
        }
    }
}
