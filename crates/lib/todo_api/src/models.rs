//! Request and response bodies.
//!
//! Every response is wrapped in an envelope: `{"success": true, "data": ...}`
//! on success, `{"success": false, "error": ..., "messages": [...]}` on failure.

use axum::Json;
use serde::{Deserialize, Serialize};
use todo_core::models::task::Task;
use todo_core::models::user::User;

/// Successful response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Wrap `data` in a success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<SuccessResponse<T>> {
    Json(SuccessResponse {
        success: true,
        data,
    })
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Stable error kind, e.g. `not_found`.
    pub error: String,
    pub messages: Vec<String>,
}

/// Body of `POST /auth/sign-up` and `POST /auth/sign-in`.
///
/// Fields are optional so that a missing one is reported as a validation
/// message instead of a body parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub login: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Body of `POST /task` and `PUT /task/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            user_id: task.user_id,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
}
