//! Backend port.
//!
//! The backend is whatever actually produces chat responses: a remote HTTP
//! agent service or a bridge process spawned per call. Use cases only see
//! the [`Backend`] trait, so the transport in effect is a configuration
//! detail.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    error::BackendError,
    value_object::{MessageContent, UserId},
};

/// Transport used to reach the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Http,
    Process,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Http => "http",
            BackendKind::Process => "process",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOperation {
    Chat,
    Clear,
    Help,
    Analyze,
    Tools,
}

impl BackendOperation {
    /// Path segment under `<base-url>/api/` for the HTTP backend
    pub fn path_segment(&self) -> &'static str {
        match self {
            BackendOperation::Chat => "chat",
            BackendOperation::Clear => "clear",
            BackendOperation::Help => "help",
            BackendOperation::Analyze => "analyze",
            BackendOperation::Tools => "tools",
        }
    }

    /// First positional argument for the bridge process
    pub fn command(&self) -> &'static str {
        match self {
            BackendOperation::Chat => "process_message",
            BackendOperation::Clear => "clear_conversation",
            BackendOperation::Help => "get_help",
            BackendOperation::Analyze => "analyze_conversation",
            BackendOperation::Tools => "test_tools",
        }
    }
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Request payload sent to the backend.
///
/// Absent fields are omitted from the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl BackendPayload {
    /// Payload without any fields (help, tools)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Payload for a chat message
    pub fn chat(content: &MessageContent, user_id: &UserId) -> Self {
        Self {
            message: Some(content.as_str().to_string()),
            user_id: Some(user_id.as_str().to_string()),
        }
    }

    /// Payload naming only a user (clear, analyze)
    pub fn for_user(user_id: &UserId) -> Self {
        Self {
            message: None,
            user_id: Some(user_id.as_str().to_string()),
        }
    }
}

/// Parsed backend answer.
///
/// `success`, `response` and `error` are the fields every backend operation
/// may return; anything else (e.g. `tools`, `test_results`) is kept in
/// `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BackendReply {
    /// Parse a JSON document; anything but a JSON object is malformed.
    pub fn from_json_str(raw: &str) -> Result<Self, BackendError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| BackendError::MalformedOutput(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, BackendError> {
        if !value.is_object() {
            return Err(BackendError::MalformedOutput(format!(
                "expected a JSON object, got {}",
                json_type_name(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| BackendError::MalformedOutput(e.to_string()))
    }

    /// Whether the backend reported a failure in-band (`success: false`)
    pub fn reported_failure(&self) -> bool {
        self.success == Some(false)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Backend Invocation Adapter
///
/// Implementations perform exactly one outbound call per invocation and
/// never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Transport in effect
    fn kind(&self) -> BackendKind;

    /// Invoke `operation` with `payload` and return the parsed answer
    async fn invoke(
        &self,
        operation: BackendOperation,
        payload: BackendPayload,
    ) -> Result<BackendReply, BackendError>;

    /// Cheap reachability check used by the health endpoint
    async fn probe(&self) -> Result<(), BackendError>;
}
