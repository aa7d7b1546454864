// File Path: src/routes/todos.rs

//! Todo Routes
//!
//! Read-only endpoints over the todo items table.

use axum::{routing::get, Router};
use crate::api::{state::AppState, todos};

/// Creates todo-related routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(todos::list_todos))
        .route("/api/todos/:id", get(todos::get_todo))
}
