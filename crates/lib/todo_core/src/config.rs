//! Authentication configuration.
//!
//! Built once at startup and handed by reference to the token manager and
//! the password hasher. Nothing in this crate reads it from global state.

use std::path::{Path, PathBuf};

use chrono::Duration;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use thiserror::Error;
use tracing::info;

/// Default token lifetime: 12 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 12 * 60 * 60;

/// Length of generated secrets.
const GENERATED_SECRET_LEN: usize = 64;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Cannot persist secret at {path}: {message}")]
    SecretFile { path: PathBuf, message: String },
}

/// Immutable auth settings: signing secret, token ttl and password salt.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub password_salt: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("password_salt", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    pub fn new(
        jwt_secret: impl Into<String>,
        token_ttl: Duration,
        password_salt: impl Into<String>,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
            password_salt: password_salt.into(),
        }
    }

    /// Reject settings that would make every token or digest meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT secret must not be empty".into()));
        }
        if self.token_ttl <= Duration::zero() {
            return Err(ConfigError::Invalid(format!(
                "token ttl must be positive, got {}s",
                self.token_ttl.num_seconds()
            )));
        }
        if self.password_salt.is_empty() {
            return Err(ConfigError::Invalid("password salt must not be empty".into()));
        }
        Ok(())
    }
}

/// Load the secret persisted as `file_name` under the user data dir,
/// generating it on first use.
///
/// Restarts must see the same value, otherwise issued tokens and stored
/// digests stop matching, so failing to persist is an error.
pub fn resolve_persisted_secret(file_name: &str) -> Result<String, ConfigError> {
    load_or_generate_secret(&secret_path(file_name))
}

/// Read the secret stored at `path`, generating and persisting one if missing.
pub fn load_or_generate_secret(path: &Path) -> Result<String, ConfigError> {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect();
    let persist_err = |e: std::io::Error| ConfigError::SecretFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(persist_err)?;
    }
    std::fs::write(path, &secret).map_err(persist_err)?;
    info!(path = %path.display(), "generated new secret");
    Ok(secret)
}

/// Path to a persisted secret file.
fn secret_path(file_name: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todo")
        .join(file_name)
}
