// File Path: src/bootstrap.rs

//! # Bootstrap
//!
//! Process start-up: configuration, telemetry, the data context, the router
//! and the server loop. Runs once per process.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    api::state::AppState,
    config::{AccessLevel, AppConfig, ResponseFormat},
    models::DataError,
    routes::create_router,
    services::{DataContext, DataContextOptions},
    telemetry,
};

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] tracing_subscriber::util::TryInitError),

    #[error("data context error: {0}")]
    Data(#[from] DataError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Loads everything and serves until Ctrl-C.
pub async fn run() -> Result<(), BootstrapError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    info!(
        environment = config.environment.as_deref().unwrap_or("<unset>"),
        "Starting HealthCheck function host..."
    );

    let state = build_state(&config).await?;
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| BootstrapError::Bind { addr: addr.clone(), source })?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(BootstrapError::Serve)
}

/// Builds the data context and the shared handler state from `config`.
///
/// An unusable descriptor fails here. An unreachable store does not: schema
/// setup is attempted once and otherwise left to first use.
pub async fn build_state(config: &AppConfig) -> Result<AppState, BootstrapError> {
    let data_context = DataContext::new(
        config.connection_strings.sql_connection_string.trim(),
        DataContextOptions::from(&config.database),
    )?;

    if config.database.initialize_on_startup {
        if let Err(e) = data_context.ensure_schema().await {
            warn!(error = %e, "Schema setup failed at startup, will retry on first use");
        }
    }

    if config.health.access_level == AccessLevel::Anonymous
        && config.health.response_format == ResponseFormat::Diagnostic
    {
        warn!(
            redacted = config.health.redact_descriptor,
            "HealthCheck is anonymous and returns the connection descriptor and raw store errors to any caller"
        );
    }

    Ok(AppState::new(
        Arc::new(data_context),
        config.health.clone(),
        config.environment.clone(),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
    info!("Shutdown signal received");
}
