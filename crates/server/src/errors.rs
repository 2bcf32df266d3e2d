use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error returned by every handler, rendered as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Service not initialized")]
    NotInitialized,
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotInitialized | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NotFound => json!({"error": self.to_string(), "status": status.as_u16()}),
            Self::Internal(msg) => {
                error!(error = %msg, "internal error");
                json!({"error": msg})
            }
            _ => json!({"error": self.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::BadRequest(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Bootstrap failure surfaced by `startup::run`.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
