//! Error handling for the game API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use memory_core::SessionError;
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::UnsupportedDifficulty(_) => ApiError::BadRequest(error.to_string()),
            SessionError::ResetNotAllowed(_) => ApiError::Conflict(error.to_string()),
            SessionError::GlossaryTooShort { .. } => ApiError::Internal(error.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use memory_core::{Difficulty, GameStatus};

    #[test]
    fn test_not_found_status() {
        let error = ApiError::NotFound("no completion yet".to_string());
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unsupported_difficulty_is_bad_request() {
        let error = ApiError::from(SessionError::UnsupportedDifficulty("extreme".to_string()));
        assert_eq!(error.to_string(), "Bad request: unsupported difficulty: extreme");
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_early_reset_is_conflict() {
        let error = ApiError::from(SessionError::ResetNotAllowed(GameStatus::Playing));
        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_short_glossary_is_internal() {
        let error = ApiError::from(SessionError::GlossaryTooShort {
            difficulty: Difficulty::Hard,
            required: 10,
            available: 4,
        });
        assert_eq!(
            error.to_string(),
            "Internal error: glossary has 4 pairs but hard needs 10"
        );
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
