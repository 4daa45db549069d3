use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage failure: {0}")]
    StorageFailure(#[source] StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => AppError::Conflict(format!("record {} already exists", id)),
            other => AppError::StorageFailure(other),
        }
    }
}

impl AppError {
    /// Only backend I/O is worth another attempt; every other kind is
    /// deterministic for the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageFailure(_))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::InvalidTarget(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::StorageFailure(e) => {
                error!("storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}
