//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::retrieval::RetrievalError;
use crate::service::submission::SubmitError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(e) => ApiError::BadRequest(e.to_string()),
            SubmitError::LogDirectory(ref source) => {
                tracing::error!("Failed to create log directory: {}", source);
                ApiError::InternalError(err.to_string())
            }
            SubmitError::LogFile(ref source) => {
                tracing::error!("Failed to create log file: {}", source);
                ApiError::InternalError(err.to_string())
            }
            SubmitError::Registration(ref source) => {
                tracing::error!("Failed to register task: {}", source);
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl From<RetrievalError> for ApiError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::NotFound(ref id) => {
                tracing::debug!("Task {} not found", id);
                ApiError::NotFound(err.to_string())
            }
            RetrievalError::Open(ref source) => {
                tracing::error!("Failed to open log file: {}", source);
                ApiError::InternalError(err.to_string())
            }
            RetrievalError::Read(ref source) => {
                tracing::error!("Failed to read log file: {}", source);
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use remoterun_core::validation::ValidationError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError = SubmitError::from(ValidationError::DuplicateOrder { order: 1 }).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Duplicate order found"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_allocation_maps_to_internal_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ApiError = SubmitError::LogDirectory(io).into();
        assert!(matches!(err, ApiError::InternalError(ref m) if m == "Failed to create log directory"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_retrieval_errors() {
        let err: ApiError = RetrievalError::NotFound("x".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ApiError = RetrievalError::Open(io).into();
        assert!(matches!(err, ApiError::InternalError(ref m) if m == "Failed to open log file"));
    }
}
