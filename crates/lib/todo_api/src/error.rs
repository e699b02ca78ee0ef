//! Application error types.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_core::auth::AuthError;
use todo_core::tasks::TaskError;
use tracing::{debug, error};

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Login already registered")]
    DuplicateLogin,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Empty auth header")]
    MissingAuthHeader,

    #[error("Invalid auth header")]
    MalformedAuthHeader,

    #[error("Identity not found in request")]
    IdentityNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// HTTP status and stable machine-readable kind.
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::DuplicateLogin => (StatusCode::CONFLICT, "duplicate_login"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::MissingAuthHeader => (StatusCode::UNAUTHORIZED, "missing_auth_header"),
            AppError::MalformedAuthHeader => (StatusCode::UNAUTHORIZED, "malformed_auth_header"),
            AppError::IdentityNotFound => (StatusCode::UNAUTHORIZED, "identity_not_found"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn messages(&self) -> Vec<String> {
        match self {
            AppError::Validation(messages) => messages.clone(),
            AppError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                vec!["Internal server error".to_string()]
            }
            other => vec![other.to_string()],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_client_error() {
            debug!(status = status.as_u16(), kind, "request rejected: {}", self);
        }
        let body = Json(ErrorResponse {
            success: false,
            error: kind.to_string(),
            messages: self.messages(),
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        debug!("rejected request body: {e}");
        AppError::Validation(vec!["invalid input body".into()])
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::DuplicateLogin => AppError::DuplicateLogin,
            AuthError::InvalidToken(msg) => AppError::InvalidToken(msg),
            AuthError::Validation(messages) => AppError::Validation(messages),
            e @ (AuthError::Hashing(_) | AuthError::TokenIssuance(_) | AuthError::Storage(_)) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<TaskError> for AppError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::NotFound(id) => AppError::NotFound(format!("task '{id}'")),
            TaskError::Validation(messages) => AppError::Validation(messages),
            e @ TaskError::Storage(_) => AppError::Internal(e.to_string()),
        }
    }
}
