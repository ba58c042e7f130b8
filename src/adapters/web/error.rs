//! HTTP error responses for web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::domain::error::ScreenerError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &ScreenerError) -> StatusCode {
    match err {
        ScreenerError::NotFound { .. } | ScreenerError::IndustryNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        ScreenerError::ConfigParse { .. }
        | ScreenerError::ConfigMissing { .. }
        | ScreenerError::ConfigInvalid { .. } => StatusCode::BAD_REQUEST,
        ScreenerError::DataLoad { .. } | ScreenerError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<ScreenerError> for WebError {
    fn from(err: ScreenerError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), error = %self.message, "request failed");
        }
        (
            self.status,
            Json(serde_json::json!({ "detail": self.message })),
        )
            .into_response()
    }
}
