//! UseCase: ヘルプの取得

use std::sync::Arc;

use crate::domain::{Backend, BackendOperation, BackendPayload, fallback::HELP_TEXT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpOutcome {
    pub response: String,
    pub fallback: bool,
}

/// ヘルプ取得のユースケース
pub struct GetHelpUseCase {
    backend: Arc<dyn Backend>,
}

impl GetHelpUseCase {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Backend help text, or the static help text when unavailable
    pub async fn execute(&self) -> HelpOutcome {
        match self
            .backend
            .invoke(BackendOperation::Help, BackendPayload::empty())
            .await
        {
            Ok(reply) => match reply.response {
                Some(response) => HelpOutcome {
                    response,
                    fallback: false,
                },
                None => {
                    tracing::warn!("Backend help reply has no response, using static help");
                    Self::fallback()
                }
            },
            Err(error) => {
                tracing::warn!(
                    operation = %BackendOperation::Help,
                    kind = error.kind(),
                    "Backend call failed: {}",
                    error
                );
                Self::fallback()
            }
        }
    }

    fn fallback() -> HelpOutcome {
        HelpOutcome {
            response: HELP_TEXT.to_string(),
            fallback: true,
        }
    }
}
