//! Domain errors.

use std::time::Duration;

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// ConnectionId が空
    #[error("Connection id cannot be empty")]
    EmptyConnectionId,

    /// UserId が空（もしくは空白のみ）
    #[error("user_id is required")]
    EmptyUserId,

    /// MessageContent が空（もしくは空白のみ）
    #[error("Message cannot be empty")]
    EmptyMessage,
}

/// Failure of a single backend invocation.
///
/// Every variant is recoverable from the caller's point of view: handlers
/// replace the backend's answer with fallback content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Connection refused, DNS failure, or the bridge executable could not be spawned
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The call did not complete within the configured duration
    #[error("backend timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The remote backend answered with a non-2xx status
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The call succeeded but the output is not the expected JSON object
    #[error("malformed backend output: {0}")]
    MalformedOutput(String),

    /// The bridge process exited with a non-zero status
    #[error("backend process failed (exit code {code:?}): {stderr}")]
    ProcessFailure { code: Option<i32>, stderr: String },
}

impl BackendError {
    /// Short, stable name of the error kind (used in logs and health output)
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Unreachable(_) => "unreachable",
            BackendError::Timeout(_) => "timeout",
            BackendError::Status { .. } => "backend-error",
            BackendError::MalformedOutput(_) => "malformed-output",
            BackendError::ProcessFailure { .. } => "process-failure",
        }
    }
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のコネクションが見つからない
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    /// チャンネルへの送信に失敗（受信側がすでに閉じている）
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
