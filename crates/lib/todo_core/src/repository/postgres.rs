//! PostgreSQL-backed repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{RepoError, RepoResult, TaskRepository, UserRepository};
use crate::models::task::{Task, TaskInput};
use crate::models::user::{NewUser, User};
use crate::uuid::{parse_id, uuidv7};

type UserRow = (String, String, String, DateTime<Utc>);
type TaskRow = (String, String, String, DateTime<Utc>, DateTime<Utc>);

const USER_COLUMNS: &str = "id::text, login, password_hash, created_at";
const TASK_COLUMNS: &str = "id::text, name, user_id::text, created_at, updated_at";

/// Relational store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn user_from_row((id, login, password_hash, created_at): UserRow) -> User {
    User {
        id,
        login,
        password_hash,
        created_at,
    }
}

fn task_from_row((id, name, user_id, created_at, updated_at): TaskRow) -> Task {
    Task {
        id,
        name,
        user_id,
        created_at,
        updated_at,
    }
}

/// Map an insert failure on `users`, turning the login unique index into `DuplicateLogin`.
fn map_user_insert_error(e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::DuplicateLogin,
        _ => RepoError::Db(e),
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, input: &NewUser) -> RepoResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (login, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(&input.login)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_insert_error)?;
        Ok(user_from_row(row))
    }

    async fn get_user_by_credentials(&self, input: &NewUser) -> RepoResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE login = $1 AND password_hash = $2"
        ))
        .bind(&input.login)
        .bind(&input.password_hash)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).ok_or(RepoError::NotFound)
    }

    async fn get_user_by_id(&self, id: &str) -> RepoResult<User> {
        let id = parse_id(id).ok_or(RepoError::NotFound)?;
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn get_task(&self, id: &str, owner_id: &str) -> RepoResult<Task> {
        let (Some(id), Some(owner)) = (parse_id(id), parse_id(owner_id)) else {
            return Err(RepoError::NotFound);
        };
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        row.map(task_from_row).ok_or(RepoError::NotFound)
    }

    async fn list_tasks(&self, owner_id: &str) -> RepoResult<Vec<Task>> {
        let Some(owner) = parse_id(owner_id) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(task_from_row).collect())
    }

    async fn create_task(&self, owner_id: &str, input: &TaskInput) -> RepoResult<Task> {
        let owner = parse_id(owner_id).ok_or(RepoError::NotFound)?;
        let now = Utc::now();
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "INSERT INTO tasks (id, name, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {TASK_COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(&input.name)
        .bind(owner)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(task_from_row(row))
    }

    async fn update_task(&self, id: &str, owner_id: &str, input: &TaskInput) -> RepoResult<Task> {
        let (Some(id), Some(owner)) = (parse_id(id), parse_id(owner_id)) else {
            return Err(RepoError::NotFound);
        };
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "UPDATE tasks SET name = $1, updated_at = $2 \
             WHERE id = $3 AND user_id = $4 RETURNING {TASK_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        row.map(task_from_row).ok_or(RepoError::NotFound)
    }

    async fn delete_task(&self, id: &str, owner_id: &str) -> RepoResult<()> {
        let (Some(id), Some(owner)) = (parse_id(id), parse_id(owner_id)) else {
            return Err(RepoError::NotFound);
        };
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
