//! UseCase: 会話の分析

use std::sync::Arc;

use crate::domain::{
    Backend, BackendOperation, BackendPayload, UserId, fallback::ANALYZE_UNAVAILABLE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    /// Analysis text produced by the backend
    Analysis(String),
    /// No analysis available; the message explains why
    Failed(String),
}

/// 会話分析のユースケース
pub struct AnalyzeConversationUseCase {
    backend: Arc<dyn Backend>,
}

impl AnalyzeConversationUseCase {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, user_id: UserId) -> AnalyzeOutcome {
        let reply = match self
            .backend
            .invoke(BackendOperation::Analyze, BackendPayload::for_user(&user_id))
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(
                    operation = %BackendOperation::Analyze,
                    user_id = %user_id,
                    kind = error.kind(),
                    "Backend call failed: {}",
                    error
                );
                return AnalyzeOutcome::Failed(ANALYZE_UNAVAILABLE.to_string());
            }
        };

        if reply.reported_failure() {
            let message = reply
                .error
                .or(reply.response)
                .unwrap_or_else(|| ANALYZE_UNAVAILABLE.to_string());
            return AnalyzeOutcome::Failed(message);
        }

        match reply.response {
            Some(analysis) => AnalyzeOutcome::Analysis(analysis),
            None => AnalyzeOutcome::Failed(
                reply
                    .error
                    .unwrap_or_else(|| ANALYZE_UNAVAILABLE.to_string()),
            ),
        }
    }
}
