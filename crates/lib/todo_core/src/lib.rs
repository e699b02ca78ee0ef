//! # todo_core
//!
//! Core domain logic for Todo: credential hashing, token management,
//! storage backends and owner-scoped task operations.

pub mod auth;
pub mod config;
pub mod migrate;
pub mod models;
pub mod repository;
pub mod tasks;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
