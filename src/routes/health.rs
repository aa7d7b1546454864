// File Path: src/routes/health.rs
//! Health Check Routes
//!
//! Mounts the `HealthCheck` function at the path the Functions host forwards to.

use axum::{routing::get, Router};
use crate::api::{health::health_check, state::AppState};

pub const HEALTH_CHECK_PATH: &str = "/api/HealthCheck";

/// Creates health-related routes and merges them into the main router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(HEALTH_CHECK_PATH, get(health_check).post(health_check))
}
