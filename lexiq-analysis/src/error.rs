//! Error types for lexiq-analysis
//!
//! Handlers return [`ApiResult`]; every error renders as the shared
//! `ErrorResponse` envelope with a stable `error_code`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use lexiq_common::api::types::ErrorResponse;

use crate::analysis::{AnalysisError, ValidationError};
use crate::services::FileError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected input (400)
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Unknown or foreign resource (404)
    #[error("{0}")]
    NotFound(String),

    /// Body over the configured limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Failure inside an analysis run (500)
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ApiError::Analysis(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ANALYSIS_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::TooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            FileError::UnsupportedType(_) => ApiError::Validation(err.to_string()),
            FileError::NotFound(_) => ApiError::NotFound(err.to_string()),
            FileError::Io(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            error!("{} ({}): {}", status, error_code, self);
        }
        let body = Json(ErrorResponse::new(error_code, self.to_string()));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let cases = [
            (ApiError::Validation("x".into()), 400, "VALIDATION_ERROR"),
            (ApiError::Unauthorized("x".into()), 401, "UNAUTHORIZED"),
            (ApiError::NotFound("x".into()), 404, "NOT_FOUND"),
            (ApiError::PayloadTooLarge("x".into()), 413, "PAYLOAD_TOO_LARGE"),
            (
                ApiError::Analysis(AnalysisError::InvalidRule("x".into())),
                500,
                "ANALYSIS_ERROR",
            ),
            (ApiError::Internal("x".into()), 500, "INTERNAL_ERROR"),
        ];
        for (err, status, code) in cases {
            let (s, c) = err.status_and_code();
            assert_eq!(s.as_u16(), status);
            assert_eq!(c, code);
        }
    }

    #[test]
    fn test_file_errors_map() {
        let err: ApiError = FileError::TooLarge { size: 2, max: 1 }.into();
        assert_eq!(err.status_and_code().0, StatusCode::PAYLOAD_TOO_LARGE);

        let err: ApiError = FileError::UnsupportedType("image/png".into()).into();
        assert_eq!(err.status_and_code().1, "VALIDATION_ERROR");
    }

    #[test]
    fn test_validation_message_is_preserved() {
        let err: ApiError = ValidationError::new("Content cannot be empty").into();
        assert_eq!(err.to_string(), "Content cannot be empty");
    }
}
