//! Task domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Owner (user id). Taken from the verified identity, never from input.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied task fields, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub name: String,
}

impl TaskInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
