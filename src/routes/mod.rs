// src/routes/mod.rs

//! # Routes Module
//!
//! Defines the main routing structure for the Axum server.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::api::{auth, state::AppState};

pub mod health;
pub mod todos;

/// Creates and configures the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(todos::routes())
        // Only matched routes are guarded, unknown paths still 404
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_access))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
