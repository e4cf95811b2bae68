//! HTTP API DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::BackendKind;

/// POST /api/chat body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub user_id: Option<String>,
}

/// POST /api/clear and POST /api/analyze body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRequest {
    pub user_id: Option<String>,
}

/// POST /api/chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub user_id: String,
    /// ISO-8601, generated when the reply is sent
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

/// POST /api/clear and /api/help response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub success: bool,
    pub response: String,
}

/// POST /api/analyze response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/tools response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// true when the static tool list was served instead of the backend's
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

/// GET /api/health response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    #[serde(rename = "connectedUsers")]
    pub connected_users: usize,
    pub backend: BackendHealthDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendHealthDto {
    pub kind: BackendKind,
    pub reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of 400 / 500 responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
