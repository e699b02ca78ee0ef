//! Storage boundary.
//!
//! Services only see these traits. Two backends implement them:
//! [`postgres::PgStore`] (relational) and [`memory::MemoryStore`]
//! (in-process document store). Which one runs is decided at composition
//! time by [`StorageBackend`].

pub mod memory;
pub mod postgres;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::task::{Task, TaskInput};
use crate::models::user::{NewUser, User};

/// Repository errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Record not found")]
    NotFound,

    #[error("Login already registered")]
    DuplicateLogin,

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// User persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with [`RepoError::DuplicateLogin`] if the login is taken.
    async fn create_user(&self, input: &NewUser) -> RepoResult<User>;

    /// Find the user whose login and password digest both match.
    async fn get_user_by_credentials(&self, input: &NewUser) -> RepoResult<User>;

    async fn get_user_by_id(&self, id: &str) -> RepoResult<User>;
}

/// Task persistence. Every method is scoped by the owner's user id.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn get_task(&self, id: &str, owner_id: &str) -> RepoResult<Task>;

    /// All tasks of `owner_id`, oldest first. Empty when there are none.
    async fn list_tasks(&self, owner_id: &str) -> RepoResult<Vec<Task>>;

    async fn create_task(&self, owner_id: &str, input: &TaskInput) -> RepoResult<Task>;

    /// Fails with [`RepoError::NotFound`] when no row matches both id and owner.
    async fn update_task(&self, id: &str, owner_id: &str, input: &TaskInput) -> RepoResult<Task>;

    /// Fails with [`RepoError::NotFound`] when no row matches both id and owner.
    async fn delete_task(&self, id: &str, owner_id: &str) -> RepoResult<()>;
}

/// Selectable storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    #[default]
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}
