//! API error handling utilities.

use crate::services::{AuthError, DiagramServiceError};
use crate::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// API error response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Log the underlying failure and answer with a generic 500.
    fn internal(source: &dyn std::fmt::Display) -> Self {
        error!("Internal error: {}", source);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            status: self.status.as_u16(),
        };

        (self.status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::internal(&err)
    }
}

impl From<DiagramServiceError> for ApiError {
    fn from(err: DiagramServiceError) -> Self {
        match err {
            DiagramServiceError::NotFound { .. } => ApiError::not_found("Diagram not found"),
            DiagramServiceError::Validation(message) => ApiError::bad_request(message),
            DiagramServiceError::Storage(err) => err.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::bad_request("Email already registered"),
            AuthError::InvalidSignup(message) => ApiError::bad_request(message),
            AuthError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
            AuthError::InvalidToken(_) => {
                ApiError::unauthorized("Token is invalid or expired")
            }
            AuthError::TokenIssue(message) => ApiError::internal(&message),
            AuthError::Storage(err) => err.into(),
        }
    }
}
