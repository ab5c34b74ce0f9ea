//! Unified API error handling
//!
//! Business modules return their own error enums; this is the only place
//! they are turned into HTTP statuses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Body rejected by the JSON extractor; keeps its 400/415/422 status
    #[error("Invalid request: {1}")]
    Validation(StatusCode, String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Error body shared by every failure response, including auth rejections.
/// Web clients read `detail`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub detail: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(status, _) => *status,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(..) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound("User not found".to_string()),
            StoreError::Storage(msg) => Self::Database(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            detail: match &self {
                Self::NotFound(msg) | Self::Validation(_, msg) => msg.clone(),
                Self::Database(_) => self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
