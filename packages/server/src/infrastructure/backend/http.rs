//! HTTP backend adapter.
//!
//! Forwards every operation as a JSON `POST <base-url>/api/<op>` and maps
//! transport failures onto [`BackendError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::{
    Backend, BackendError, BackendKind, BackendOperation, BackendPayload, BackendReply,
};

use super::BackendBuildError;

pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    /// Create an adapter for the service at `base_url`.
    ///
    /// `timeout` bounds each call end to end (connect, send, and body read).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendBuildError> {
        Url::parse(base_url).map_err(|e| BackendBuildError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn endpoint(&self, path_segment: &str) -> String {
        format!("{}/api/{}", self.base_url, path_segment)
    }

    fn classify(&self, error: reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            // connection refused, DNS, TLS, reset while reading
            BackendError::Unreachable(error.to_string())
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Http
    }

    async fn invoke(
        &self,
        operation: BackendOperation,
        payload: BackendPayload,
    ) -> Result<BackendReply, BackendError> {
        let url = self.endpoint(operation.path_segment());
        tracing::debug!("POST {} ({})", url, operation);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        BackendReply::from_json_str(&body)
    }

    async fn probe(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.endpoint("health"))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Status {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("health check failed")
                    .to_string(),
            })
        }
    }
}

/// Pick a human-readable message out of an error response body.
///
/// Prefers a JSON `error` (or `message`) field, then the raw body, then the
/// status's canonical reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.endpoint("chat"), "http://localhost:8000/api/chat");
    }

    #[test]
    fn test_error_message_prefers_json_error_field() {
        // テスト項目: エラーレスポンスの JSON に error があればそれを使う
        let message = error_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"agent crashed"}"#,
        );
        assert_eq!(message, "agent crashed");
    }

    #[test]
    fn test_error_message_falls_back_to_body_then_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "  upstream down \n"),
            "upstream down"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }
}
