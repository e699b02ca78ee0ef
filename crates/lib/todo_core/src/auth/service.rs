//! Authentication service: register, authenticate and token checks.
//!
//! Orchestrates the password hasher, the token manager and the user
//! repository. Holds no mutable state, so one instance is shared by every
//! request.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use super::AuthError;
use super::jwt::TokenManager;
use super::password::PasswordHasher;
use crate::models::user::{Credentials, NewUser, User};
use crate::repository::{RepoError, UserRepository};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenManager>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Create a user and return a token for it.
    pub async fn register(&self, credentials: &Credentials) -> Result<String, AuthError> {
        validate_credentials(credentials)?;
        let password_hash = self.hasher.hash(&credentials.password)?;
        let user = self
            .users
            .create_user(&NewUser {
                login: credentials.login.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepoError::DuplicateLogin => AuthError::DuplicateLogin,
                other => AuthError::Storage(other),
            })?;
        info!(user_id = %user.id, login = %user.login, "user registered");
        self.tokens.issue(&user.id)
    }

    /// Exchange a login + password for a token.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String, AuthError> {
        validate_credentials(credentials)?;
        let password_hash = self.hasher.hash(&credentials.password)?;
        let user = self
            .users
            .get_user_by_credentials(&NewUser {
                login: credentials.login.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepoError::NotFound => {
                    debug!(login = %credentials.login, "sign-in rejected");
                    AuthError::InvalidCredentials
                }
                other => AuthError::Storage(other),
            })?;
        info!(user_id = %user.id, "user signed in");
        self.tokens.issue(&user.id)
    }

    /// Verify a token and return its subject (the user id).
    pub fn check(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.verify(token)
    }

    /// Load the user a verified token belongs to.
    pub async fn current_user(&self, user_id: &str) -> Result<User, AuthError> {
        self.users.get_user_by_id(user_id).await.map_err(|e| match e {
            RepoError::NotFound => AuthError::InvalidToken("user no longer exists".into()),
            other => AuthError::Storage(other),
        })
    }

    /// Lifetime of the tokens this service issues.
    pub fn token_ttl(&self) -> Duration {
        self.tokens.ttl()
    }
}

/// Both fields are required; each missing one gets its own message.
fn validate_credentials(credentials: &Credentials) -> Result<(), AuthError> {
    let mut messages = Vec::new();
    if credentials.login.trim().is_empty() {
        messages.push("invalid 'Login' input".to_string());
    }
    if credentials.password.is_empty() {
        messages.push("invalid 'Password' input".to_string());
    }
    if messages.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(messages))
    }
}
