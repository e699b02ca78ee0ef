//! # todo_api
//!
//! HTTP API library for Todo.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use todo_core::auth::jwt::JwtManager;
use todo_core::auth::password::SaltedSha256Hasher;
use todo_core::auth::service::AuthService;
use todo_core::repository::{TaskRepository, UserRepository};
use todo_core::tasks::TaskService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health, tasks};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Wire services over the given repositories using `config.auth`.
    pub fn new(
        config: ApiConfig,
        users: Arc<dyn UserRepository>,
        task_repo: Arc<dyn TaskRepository>,
    ) -> Self {
        let auth = AuthService::new(
            users,
            Arc::new(SaltedSha256Hasher::from_config(&config.auth)),
            Arc::new(JwtManager::from_config(&config.auth)),
        );
        Self {
            auth,
            tasks: TaskService::new(task_repo),
            config,
        }
    }

    /// Wire services over a single store implementing both repositories.
    pub fn from_store<S>(config: ApiConfig, store: Arc<S>) -> Self
    where
        S: UserRepository + TaskRepository + 'static,
    {
        Self::new(config, store.clone(), store)
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(routes::POST_AUTH_SIGN_UP, post(auth::sign_up_handler))
        .route(routes::POST_AUTH_SIGN_IN, post(auth::sign_in_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::GET_AUTH_ME, get(auth::me_handler))
        .route(
            routes::TASKS,
            get(tasks::list_tasks_handler).post(tasks::create_task_handler),
        )
        .route(
            routes::TASKS_ID,
            get(tasks::get_task_handler)
                .put(tasks::update_task_handler)
                .delete(tasks::delete_task_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
