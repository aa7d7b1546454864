// File Path: src/config.rs

//! # Configuration
//!
//! Layered settings, lowest precedence first:
//! 1. `config/default.*` (optional)
//! 2. `config/<environment>.*` (optional, environment name lowercased)
//! 3. `FUNCTION_APP_*` environment variables, `__` separating nested keys
//!    (e.g. `FUNCTION_APP_CONNECTION_STRINGS__SQL_CONNECTION_STRING`)
//! 4. `FUNCTIONS_CUSTOMHANDLER_PORT`, which pins `server.port`
//!
//! The environment name is read from `AZURE_FUNCTIONS_ENVIRONMENT`.

use std::{collections::HashMap, env, path::Path, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const ENV_PREFIX: &str = "FUNCTION_APP";
pub const ENVIRONMENT_VAR: &str = "AZURE_FUNCTIONS_ENVIRONMENT";
pub const CUSTOM_HANDLER_PORT_VAR: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub connection_strings: ConnectionStrings,
    /// Display name of the active environment (`Development`, `Production`, ...)
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub health: HealthSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionStrings {
    /// Store URL, `postgres://...` or `sqlite:...`
    #[serde(default)]
    pub sql_connection_string: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Upper bound for a single connectivity probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Insert the two sample rows while setting up the schema
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
    /// Try to set up the schema at startup instead of waiting for first use
    #[serde(default = "default_true")]
    pub initialize_on_startup: bool,
}

/// Who may call the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// No key required. Combined with the diagnostic format this hands the
    /// descriptor and raw store errors to any caller.
    Anonymous,
    /// A key from `health.function_keys` must be presented.
    #[default]
    Function,
}

/// Shape of the health response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Connectivity line only
    Minimal,
    /// Connectivity, descriptor, environment and error message
    #[default]
    Diagnostic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthSettings {
    #[serde(default)]
    pub access_level: AccessLevel,
    #[serde(default)]
    pub function_keys: Vec<String>,
    #[serde(default)]
    pub response_format: ResponseFormat,
    /// Mask the password before the descriptor is echoed back
    #[serde(default = "default_true")]
    pub redact_descriptor: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Fallback filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// Load from `config/` and the process environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_DIR), None)
    }

    /// Load from `dir`, reading variables from `vars` when given instead of
    /// the process environment.
    pub fn load_from(
        dir: &Path,
        vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let lookup = |name: &str| match &vars {
            Some(map) => map.get(name).cloned(),
            None => env::var(name).ok(),
        };
        let environment = lookup(ENVIRONMENT_VAR).filter(|name| !name.trim().is_empty());
        let port = lookup(CUSTOM_HANDLER_PORT_VAR);

        let mut builder = Config::builder()
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false));

        if let Some(name) = &environment {
            let overlay = dir.join(name.to_lowercase());
            builder = builder.add_source(File::with_name(&overlay.to_string_lossy()).required(false));
        }

        let cfg = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("health.function_keys")
                    .try_parsing(true)
                    .source(vars.clone()),
            )
            .set_override_option("environment", environment)?
            .set_override_option("server.port", port)?
            .build()?;

        let config: AppConfig = cfg.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the process cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection_strings.sql_connection_string.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "connection_strings.sql_connection_string is required \
                 (or {ENV_PREFIX}_CONNECTION_STRINGS__SQL_CONNECTION_STRING)"
            )));
        }
        if self.health.access_level == AccessLevel::Function
            && self.health.function_keys.iter().all(|key| key.trim().is_empty())
        {
            return Err(ConfigError::Message(
                "health.access_level is `function` but health.function_keys is empty".to_string(),
            ));
        }
        if self.database.probe_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "database.probe_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            probe_timeout_secs: default_probe_timeout_secs(),
            seed_sample_data: true,
            initialize_on_startup: true,
        }
    }
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            access_level: AccessLevel::default(),
            function_keys: Vec::new(),
            response_format: ResponseFormat::default(),
            redact_descriptor: true,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    7071
}
fn default_max_connections() -> u32 {
    5
}
fn default_probe_timeout_secs() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.connection_strings.sql_connection_string = "sqlite::memory:".to_string();
        config.health.function_keys = vec!["secret".to_string()];
        config
    }

    #[test]
    fn defaults_are_locked_down() {
        let config = AppConfig::default();
        assert_eq!(config.health.access_level, AccessLevel::Function);
        assert_eq!(config.health.response_format, ResponseFormat::Diagnostic);
        assert!(config.health.redact_descriptor);
        assert_eq!(config.database.probe_timeout(), Duration::from_secs(5));
        assert!(config.database.seed_sample_data);
        assert_eq!(config.bind_addr(), "0.0.0.0:7071");
    }

    #[test]
    fn missing_connection_string_is_rejected() {
        let mut config = valid();
        config.connection_strings.sql_connection_string = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sql_connection_string"));
    }

    #[test]
    fn function_level_without_keys_is_rejected() {
        let mut config = valid();
        config.health.function_keys.clear();
        assert!(config.validate().is_err());

        config.health.access_level = AccessLevel::Anonymous;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_probe_timeout_is_rejected() {
        let mut config = valid();
        config.database.probe_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
