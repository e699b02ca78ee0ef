//! Task request handlers. All routes require authentication.
//!
//! The owner passed to the service is always the caller's verified id;
//! request bodies carry no owner field.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use todo_core::models::task::TaskInput;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{SuccessResponse, TaskRequest, TaskResponse, ok};

type TaskResult<T> = AppResult<Json<SuccessResponse<T>>>;

fn task_input(body: TaskRequest) -> TaskInput {
    TaskInput::new(body.name.unwrap_or_default())
}

/// `GET /api/v1/task` — list the caller's tasks.
pub async fn list_tasks_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> TaskResult<Vec<TaskResponse>> {
    let tasks = state.tasks.list(user.user_id()).await?;
    Ok(ok(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// `POST /api/v1/task` — create a task owned by the caller.
pub async fn create_task_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> TaskResult<TaskResponse> {
    let Json(body) = payload?;
    let task = state.tasks.create(user.user_id(), &task_input(body)).await?;
    Ok(ok(task.into()))
}

/// `GET /api/v1/task/{id}`
pub async fn get_task_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> TaskResult<TaskResponse> {
    let task = state.tasks.get(&id, user.user_id()).await?;
    Ok(ok(task.into()))
}

/// `PUT /api/v1/task/{id}`
pub async fn update_task_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> TaskResult<TaskResponse> {
    let Json(body) = payload?;
    let task = state
        .tasks
        .update(&id, user.user_id(), &task_input(body))
        .await?;
    Ok(ok(task.into()))
}

/// `DELETE /api/v1/task/{id}`
pub async fn delete_task_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> TaskResult<Option<()>> {
    state.tasks.delete(&id, user.user_id()).await?;
    Ok(ok(None))
}
