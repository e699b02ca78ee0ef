//! Domain models.
//!
//! These are internal domain models, distinct from the HTTP DTOs in
//! `todo_api::models` (which carry the response envelope and camelCase names).

pub mod task;
pub mod user;
