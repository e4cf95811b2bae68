//! HTTP error responses.
//!
//! Only local problems surface as errors: malformed input (400) and
//! unexpected failures inside the gateway (500). Backend outages never do.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{domain::ValueObjectError, infrastructure::dto::http::ErrorResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed local input
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected failure in handler logic
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(error: ValueObjectError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(message) => tracing::warn!("Bad request: {}", message),
            ApiError::Internal(message) => tracing::error!("Internal error: {}", message),
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
