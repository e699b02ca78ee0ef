//! Authentication and authorization logic.
//!
//! Provides credential hashing, JWT management and the auth service that
//! `todo_api` exposes through its handlers and middleware.

pub mod jwt;
pub mod password;
pub mod service;

use thiserror::Error;

use crate::repository::RepoError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Login already registered")]
    DuplicateLogin,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// One message per offending field.
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Storage error: {0}")]
    Storage(RepoError),
}
