//! In-process document store.
//!
//! Each collection is a `DashMap` keyed by document id. Login uniqueness is
//! guarded by a separate login → id index whose entry lock is held while the
//! user document is inserted, so two concurrent registrations of the same
//! login cannot both succeed.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{RepoError, RepoResult, TaskRepository, UserRepository};
use crate::models::task::{Task, TaskInput};
use crate::models::user::{NewUser, User};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    logins: DashMap<String, String>,
    tasks: DashMap<String, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: &NewUser) -> RepoResult<User> {
        match self.logins.entry(input.login.clone()) {
            Entry::Occupied(_) => Err(RepoError::DuplicateLogin),
            Entry::Vacant(slot) => {
                let user = User {
                    id: uuidv7().to_string(),
                    login: input.login.clone(),
                    password_hash: input.password_hash.clone(),
                    created_at: Utc::now(),
                };
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(user)
            }
        }
    }

    async fn get_user_by_credentials(&self, input: &NewUser) -> RepoResult<User> {
        let id = self
            .logins
            .get(&input.login)
            .map(|entry| entry.value().clone())
            .ok_or(RepoError::NotFound)?;
        self.users
            .get(&id)
            .filter(|user| user.password_hash == input.password_hash)
            .map(|user| user.value().clone())
            .ok_or(RepoError::NotFound)
    }

    async fn get_user_by_id(&self, id: &str) -> RepoResult<User> {
        self.users
            .get(id)
            .map(|user| user.value().clone())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn get_task(&self, id: &str, owner_id: &str) -> RepoResult<Task> {
        self.tasks
            .get(id)
            .filter(|task| task.user_id == owner_id)
            .map(|task| task.value().clone())
            .ok_or(RepoError::NotFound)
    }

    async fn list_tasks(&self, owner_id: &str) -> RepoResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| task.user_id == owner_id)
            .map(|task| task.value().clone())
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn create_task(&self, owner_id: &str, input: &TaskInput) -> RepoResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: uuidv7().to_string(),
            name: input.name.clone(),
            user_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &str, owner_id: &str, input: &TaskInput) -> RepoResult<Task> {
        let mut task = self
            .tasks
            .get_mut(id)
            .filter(|task| task.user_id == owner_id)
            .ok_or(RepoError::NotFound)?;
        task.name = input.name.clone();
        task.updated_at = Utc::now();
        Ok(task.value().clone())
    }

    async fn delete_task(&self, id: &str, owner_id: &str) -> RepoResult<()> {
        self.tasks
            .remove_if(id, |_, task| task.user_id == owner_id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_user(login: &str, hash: &str) -> NewUser {
        NewUser {
            login: login.into(),
            password_hash: hash.into(),
        }
    }

    #[tokio::test]
    async fn create_user_assigns_id() {
        let store = MemoryStore::new();
        let user = store.create_user(&new_user("alice", "h1")).await.unwrap();
        assert!(!user.id.is_empty());
        assert_eq!(user.login, "alice");
        assert_eq!(store.get_user_by_id(&user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn duplicate_login_is_rejected_and_first_user_kept() {
        let store = MemoryStore::new();
        let first = store.create_user(&new_user("alice", "h1")).await.unwrap();
        let err = store.create_user(&new_user("alice", "h2")).await.unwrap_err();
        assert!(matches!(err, RepoError::DuplicateLogin));

        let found = store
            .get_user_by_credentials(&new_user("alice", "h1"))
            .await
            .unwrap();
        assert_eq!(found, first);
        assert!(
            store
                .get_user_by_credentials(&new_user("alice", "h2"))
                .await
                .is_err()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_of_same_login_yield_one_user() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_user(&new_user("race", &format!("h{i}")))
                        .await
                        .is_ok()
                })
            })
            .collect();
        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn credentials_lookup_requires_matching_hash() {
        let store = MemoryStore::new();
        store.create_user(&new_user("alice", "h1")).await.unwrap();
        let err = store
            .get_user_by_credentials(&new_user("alice", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
        let err = store
            .get_user_by_credentials(&new_user("bob", "h1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn tasks_are_scoped_by_owner() {
        let store = MemoryStore::new();
        let task = store
            .create_task("u1", &TaskInput::new("buy milk"))
            .await
            .unwrap();
        assert_eq!(task.user_id, "u1");
        assert_eq!(task.created_at, task.updated_at);

        assert_eq!(store.get_task(&task.id, "u1").await.unwrap(), task);
        assert!(matches!(
            store.get_task(&task.id, "u2").await,
            Err(RepoError::NotFound)
        ));
        assert!(store.list_tasks("u2").await.unwrap().is_empty());
        assert!(matches!(
            store.update_task(&task.id, "u2", &TaskInput::new("x")).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            store.delete_task(&task.id, "u2").await,
            Err(RepoError::NotFound)
        ));
        // foreign attempts left the task untouched
        assert_eq!(store.get_task(&task.id, "u1").await.unwrap().name, "buy milk");
    }

    #[tokio::test]
    async fn list_is_oldest_first() {
        let store = MemoryStore::new();
        let a = store.create_task("u1", &TaskInput::new("a")).await.unwrap();
        let b = store.create_task("u1", &TaskInput::new("b")).await.unwrap();
        let c = store.create_task("u1", &TaskInput::new("c")).await.unwrap();
        let ids: Vec<String> = store
            .list_tasks("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn update_changes_name_and_timestamp() {
        let store = MemoryStore::new();
        let task = store.create_task("u1", &TaskInput::new("old")).await.unwrap();
        let updated = store
            .update_task(&task.id, "u1", &TaskInput::new("new"))
            .await
            .unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.name, "new");
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let store = MemoryStore::new();
        let task = store.create_task("u1", &TaskInput::new("x")).await.unwrap();
        store.delete_task(&task.id, "u1").await.unwrap();
        assert!(matches!(
            store.delete_task(&task.id, "u1").await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            store.get_task(&task.id, "u1").await,
            Err(RepoError::NotFound)
        ));
    }
}
