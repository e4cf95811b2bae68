//! UseCase: 利用可能なツール一覧の取得

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{Backend, BackendOperation, BackendPayload, fallback::fallback_tools};

#[derive(Debug, Clone, PartialEq)]
pub enum ToolsOutcome {
    /// Tool listing reported by the backend, forwarded verbatim
    Listed {
        success: bool,
        tools: Option<Value>,
        error: Option<String>,
    },
    /// Static tool list served because the backend could not answer
    Fallback { tools: Value },
}

/// ツール一覧取得のユースケース
pub struct ListToolsUseCase {
    backend: Arc<dyn Backend>,
}

impl ListToolsUseCase {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self) -> ToolsOutcome {
        match self
            .backend
            .invoke(BackendOperation::Tools, BackendPayload::empty())
            .await
        {
            Ok(mut reply) => {
                // The HTTP service answers with `tools`, the bridge with `test_results`.
                let tools = reply
                    .extra
                    .remove("tools")
                    .or_else(|| reply.extra.remove("test_results"));
                ToolsOutcome::Listed {
                    success: reply.success.unwrap_or(true),
                    tools,
                    error: reply.error,
                }
            }
            Err(error) => {
                tracing::warn!(
                    operation = %BackendOperation::Tools,
                    kind = error.kind(),
                    "Backend call failed: {}",
                    error
                );
                ToolsOutcome::Fallback {
                    tools: fallback_tools(),
                }
            }
        }
    }
}
