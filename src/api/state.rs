// src/api/state.rs

//! # Application State
//!
//! Defines the shared state that will be accessible by all route handlers.

use std::sync::Arc;

use crate::{config::HealthSettings, services::DataContext};

/// The core application state, wrapped in Arcs for thread-safe sharing.
#[derive(Clone)]
pub struct AppState {
    // Single store handle built at startup.
    pub data_context: Arc<DataContext>,
    // Access level, keys and response shape of the health endpoint.
    pub health: Arc<HealthSettings>,
    // Environment name shown in diagnostics, fixed at startup.
    pub environment: Option<Arc<str>>,
}

impl AppState {
    /// Creates a new instance of the application state.
    pub fn new(
        data_context: Arc<DataContext>,
        health: HealthSettings,
        environment: Option<String>,
    ) -> Self {
        AppState {
            data_context,
            health: Arc::new(health),
            environment: environment.map(Arc::from),
        }
    }
}
