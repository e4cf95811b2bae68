//! UseCase: 会話履歴のクリア
//!
//! クリアはバックエンドの状態に関わらず常に成功として報告します。

use std::sync::Arc;

use crate::domain::{
    Backend, BackendOperation, BackendPayload, UserId, fallback::CLEARED_TEXT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    pub response: String,
    /// true when the backend could not be reached
    pub fallback: bool,
}

/// 会話履歴クリアのユースケース
pub struct ClearConversationUseCase {
    backend: Arc<dyn Backend>,
}

impl ClearConversationUseCase {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, user_id: UserId) -> ClearOutcome {
        match self
            .backend
            .invoke(BackendOperation::Clear, BackendPayload::for_user(&user_id))
            .await
        {
            Ok(reply) => {
                tracing::info!("Cleared conversation for '{}'", user_id);
                ClearOutcome {
                    response: reply.response.unwrap_or_else(|| CLEARED_TEXT.to_string()),
                    fallback: false,
                }
            }
            Err(error) => {
                tracing::warn!(
                    operation = %BackendOperation::Clear,
                    user_id = %user_id,
                    kind = error.kind(),
                    "Backend call failed: {}",
                    error
                );
                ClearOutcome {
                    response: CLEARED_TEXT.to_string(),
                    fallback: true,
                }
            }
        }
    }
}
