// File Path: src/telemetry.rs

//! # Telemetry
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` takes precedence over
//! the configured level; JSON output is for hosts that ship stdout to a
//! collector.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError};

use crate::config::TelemetryConfig;

pub fn init(config: &TelemetryConfig) -> Result<(), TryInitError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level.as_str().into());

    tracing_subscriber::registry()
        .with(filter)
        .with(config.json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.json).then(|| tracing_subscriber::fmt::layer()))
        .try_init()
}
