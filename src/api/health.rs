// File Path: src/api/health.rs
//! HealthCheck Handler
//!
//! Probes the store and answers with a plain-text report. The status code is
//! always 200; a database outage shows up in the body only.

use axum::{extract::State, http::Method};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{api::state::AppState, config::ResponseFormat};

/// Everything the response body can report about one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub connected: bool,
    pub descriptor: String,
    pub environment: String,
    pub error_message: String,
}

impl HealthReport {
    /// Renders the body. Each field sits on its own `|`-terminated line;
    /// line breaks inside values are flattened so the line count is fixed.
    pub fn render(&self, format: ResponseFormat) -> String {
        let connected = format!("Connected: {}|\n", display_bool(self.connected));

        match format {
            ResponseFormat::Minimal => connected,
            ResponseFormat::Diagnostic => format!(
                "{connected}With connection string: {}|\nEnvironment: {}|\nError Message: {}|\n",
                single_line(&self.descriptor),
                single_line(&self.environment),
                single_line(&self.error_message),
            ),
        }
    }
}

/// `HealthCheck` function, GET or POST.
#[instrument(skip_all, fields(invocation_id = %Uuid::new_v4()))]
pub async fn health_check(method: Method, State(state): State<AppState>) -> String {
    info!(%method, "HealthCheck processed a request");

    let probe = state.data_context.probe().await;

    let descriptor = if state.health.redact_descriptor {
        state.data_context.redacted_descriptor()
    } else {
        state.data_context.connection_descriptor().to_string()
    };

    let report = HealthReport {
        connected: probe.success,
        descriptor,
        environment: state.environment.as_deref().unwrap_or_default().to_string(),
        error_message: probe.error_text().to_string(),
    };

    report.render(state.health.response_format)
}

fn display_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
