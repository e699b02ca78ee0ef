//! Owner-scoped task operations.
//!
//! Every operation takes the caller's user id as an explicit argument and
//! passes it to the repository alongside the task id. A task owned by
//! someone else is reported exactly like a task that does not exist.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::task::{Task, TaskInput};
use crate::repository::{RepoError, TaskRepository};

/// Task errors.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(String),

    /// One message per offending field.
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(RepoError),
}

impl TaskError {
    fn from_repo(e: RepoError, id: &str) -> Self {
        match e {
            RepoError::NotFound => TaskError::NotFound(id.to_string()),
            other => TaskError::Storage(other),
        }
    }
}

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: &str, owner_id: &str) -> Result<Task, TaskError> {
        self.repo
            .get_task(id, owner_id)
            .await
            .map_err(|e| TaskError::from_repo(e, id))
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Task>, TaskError> {
        self.repo.list_tasks(owner_id).await.map_err(TaskError::Storage)
    }

    pub async fn create(&self, owner_id: &str, input: &TaskInput) -> Result<Task, TaskError> {
        validate_input(input)?;
        let task = self
            .repo
            .create_task(owner_id, input)
            .await
            .map_err(TaskError::Storage)?;
        info!(task_id = %task.id, user_id = %owner_id, "task created");
        Ok(task)
    }

    pub async fn update(
        &self,
        id: &str,
        owner_id: &str,
        input: &TaskInput,
    ) -> Result<Task, TaskError> {
        validate_input(input)?;
        let task = self
            .repo
            .update_task(id, owner_id, input)
            .await
            .map_err(|e| TaskError::from_repo(e, id))?;
        debug!(task_id = %task.id, user_id = %owner_id, "task updated");
        Ok(task)
    }

    pub async fn delete(&self, id: &str, owner_id: &str) -> Result<(), TaskError> {
        self.repo
            .delete_task(id, owner_id)
            .await
            .map_err(|e| TaskError::from_repo(e, id))?;
        info!(task_id = %id, user_id = %owner_id, "task deleted");
        Ok(())
    }
}

fn validate_input(input: &TaskInput) -> Result<(), TaskError> {
    if input.name.trim().is_empty() {
        return Err(TaskError::Validation(vec!["invalid 'Name' input".into()]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryStore;

    const U1: &str = "user-1";
    const U2: &str = "user-2";

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn ownership_scenario() {
        let svc = service();

        let r = svc.create(U1, &TaskInput::new("buy milk")).await.unwrap();
        assert_eq!(r.user_id, U1);
        assert_eq!(r.name, "buy milk");

        assert_eq!(svc.list(U1).await.unwrap(), vec![r.clone()]);
        assert!(svc.list(U2).await.unwrap().is_empty());

        assert!(matches!(svc.delete(&r.id, U2).await, Err(TaskError::NotFound(_))));
        svc.delete(&r.id, U1).await.unwrap();
        assert!(matches!(svc.get(&r.id, U1).await, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn foreign_get_and_update_are_not_found() {
        let svc = service();
        let r = svc.create(U2, &TaskInput::new("secret")).await.unwrap();

        assert!(matches!(svc.get(&r.id, U1).await, Err(TaskError::NotFound(_))));
        assert!(matches!(
            svc.update(&r.id, U1, &TaskInput::new("hijacked")).await,
            Err(TaskError::NotFound(_))
        ));
        assert_eq!(svc.get(&r.id, U2).await.unwrap().name, "secret");
    }

    #[tokio::test]
    async fn foreign_and_missing_errors_are_identical() {
        let svc = service();
        let r = svc.create(U2, &TaskInput::new("x")).await.unwrap();
        let foreign = svc.get(&r.id, U1).await.unwrap_err().to_string();
        svc.delete(&r.id, U2).await.unwrap();
        let missing = svc.get(&r.id, U1).await.unwrap_err().to_string();
        assert_eq!(foreign, missing);
    }

    #[tokio::test]
    async fn update_by_owner_changes_name() {
        let svc = service();
        let r = svc.create(U1, &TaskInput::new("draft")).await.unwrap();
        let updated = svc.update(&r.id, U1, &TaskInput::new("final")).await.unwrap();
        assert_eq!(updated.name, "final");
        assert_eq!(updated.created_at, r.created_at);
        assert_eq!(svc.get(&r.id, U1).await.unwrap().name, "final");
    }

    #[tokio::test]
    async fn update_of_missing_task_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.update("no-such-id", U1, &TaskInput::new("x")).await,
            Err(TaskError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_of_missing_task_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.delete("no-such-id", U1).await,
            Err(TaskError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let svc = service();
        assert!(matches!(
            svc.create(U1, &TaskInput::new("   ")).await,
            Err(TaskError::Validation(_))
        ));
        let r = svc.create(U1, &TaskInput::new("ok")).await.unwrap();
        assert!(matches!(
            svc.update(&r.id, U1, &TaskInput::new("")).await,
            Err(TaskError::Validation(_))
        ));
    }
}
