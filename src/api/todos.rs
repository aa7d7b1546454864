// File Path: src/api/todos.rs
//! Todo API Handlers
//! Read-only views over `todo_items`.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    api::state::AppState,
    models::{ApiError, ApiResult, TodoItem},
};

/// Lists every stored item ordered by id.
pub async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<Vec<TodoItem>>> {
    let items = state.data_context.list_todo_items().await?;
    Ok(Json(items))
}

/// Fetches one item by id.
pub async fn get_todo(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> ApiResult<Json<TodoItem>> {
    state
        .data_context
        .find_todo_item(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("todo item {id}")))
}
