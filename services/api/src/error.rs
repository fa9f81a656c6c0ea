//! Custom error types for the API service

use auth::{CredentialError, SessionError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing resource with message
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflicting resource with message
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Credential error
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Record not found".to_string())
            }
            ApiError::Store(StoreError::UniqueConstraintViolation(_)) => {
                (StatusCode::CONFLICT, "Record already exists".to_string())
            }
            ApiError::Store(StoreError::ForeignKeyViolation(_)) => (
                StatusCode::NOT_FOUND,
                "Referenced user does not exist".to_string(),
            ),
            ApiError::Store(StoreError::SelfFollow) => (
                StatusCode::BAD_REQUEST,
                "You cannot follow yourself".to_string(),
            ),
            ApiError::Store(StoreError::StoreUnavailable(_)) => {
                error!("{}", self);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service unavailable".to_string(),
                )
            }
            ApiError::Store(_) | ApiError::Credential(_) | ApiError::Session(_) => {
                error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_status_codes() {
        let cases = [
            (
                ApiError::Store(StoreError::UniqueConstraintViolation("users.username".into())),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Store(StoreError::ForeignKeyViolation("posts.user_id".into())),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::Store(StoreError::SelfFollow), StatusCode::BAD_REQUEST),
            (
                ApiError::Store(StoreError::StoreUnavailable(sqlx::Error::PoolClosed)),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Credential(CredentialError::InvalidCredentialFormat("bad".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
