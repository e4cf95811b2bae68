//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame tagged by `type`.

use serde::{Deserialize, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientEvent {
    /// `{"type":"join","user_id":"alice"}`
    Join {
        #[serde(default)]
        user_id: Option<String>,
    },
    /// `{"type":"message","message":"hi","user_id":"alice"}`
    Message {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        user_id: Option<String>,
    },
}

impl ClientEvent {
    /// Parse a text frame. Anything that is not a known event is treated as
    /// a plain chat message body.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Failed to parse frame as an event, treating as text: {}", e);
                ClientEvent::Message {
                    message: Some(text.to_string()),
                    user_id: None,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Message,
}

/// Reply event sent back to the originating connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    pub r#type: MessageType,
    pub message: String,
    /// ISO-8601, generated when the reply is sent
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl ServerMessage {
    pub fn new(message: String, timestamp: String, success: Option<bool>) -> Self {
        Self {
            r#type: MessageType::Message,
            message,
            timestamp,
            success,
        }
    }

    /// Error-wrapped reply
    pub fn failure(message: String, timestamp: String) -> Self {
        Self::new(message, timestamp, Some(false))
    }
}
