// File Path: src/services/data_context.rs

//! # Data Context
//!
//! Owns the `todo_items` mapping and everything that talks to the store:
//! schema setup (with optional seeding), the connectivity probe and the
//! connection descriptor shown in diagnostics.

use std::{str::FromStr, time::Duration};

use sqlx::{
    any::{install_default_drivers, AnyConnectOptions, AnyPoolOptions},
    AnyConnection, AnyPool, Connection,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::DatabaseConfig,
    models::{DataError, DataResult},
    services::schema::{Dialect, SeedMode, INSERT_SEED_ROW, SEED_ROWS, TODO_TABLE},
};

const REDACTED: &str = "redacted";

/// Outcome of one connectivity probe. Failures carry the store's error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub success: bool,
    pub error_message: Option<String>,
}

impl ProbeResult {
    pub fn connected() -> Self {
        Self { success: true, error_message: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, error_message: Some(message.into()) }
    }

    /// Error text, empty when the probe succeeded.
    pub fn error_text(&self) -> &str {
        self.error_message.as_deref().unwrap_or("")
    }
}

/// Knobs for [`DataContext::new`].
#[derive(Debug, Clone, Copy)]
pub struct DataContextOptions {
    pub max_connections: u32,
    pub probe_timeout: Duration,
    pub seed: SeedMode,
}

impl From<&DatabaseConfig> for DataContextOptions {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            probe_timeout: config.probe_timeout(),
            seed: config.seed_sample_data.into(),
        }
    }
}

/// Process-wide handle on the store. Built once at startup and shared behind
/// an `Arc`; nothing in it changes after construction except the pool's own
/// connections and the one-shot schema cell.
pub struct DataContext {
    descriptor: String,
    dialect: Dialect,
    connect_options: AnyConnectOptions,
    pool: AnyPool,
    probe_timeout: Duration,
    seed: SeedMode,
    schema_ready: OnceCell<()>,
}

// ====================================================
// SECTION: Construction
// ====================================================

impl DataContext {
    /// Parses the descriptor and prepares a lazy pool. No connection is opened.
    pub fn new(descriptor: impl Into<String>, options: DataContextOptions) -> DataResult<Self> {
        install_default_drivers();

        let descriptor = descriptor.into();
        let dialect = Dialect::detect(&descriptor)?;
        let connect_options = AnyConnectOptions::from_str(&descriptor)
            .map_err(|e| DataError::InvalidDescriptor(e.to_string()))?;

        // Every connection to an in-memory SQLite store is a separate database.
        let max_connections = if dialect == Dialect::Sqlite && is_in_memory(&descriptor) {
            1
        } else {
            options.max_connections.max(1)
        };

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(options.probe_timeout)
            .connect_lazy_with(connect_options.clone());

        info!(?dialect, max_connections, seed = ?options.seed, "Data context configured");

        Ok(Self {
            descriptor,
            dialect,
            connect_options,
            pool,
            probe_timeout: options.probe_timeout,
            seed: options.seed,
            schema_ready: OnceCell::new(),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

// ====================================================
// SECTION: Descriptor
// ====================================================

impl DataContext {
    /// The descriptor exactly as configured.
    pub fn connection_descriptor(&self) -> &str {
        &self.descriptor
    }

    /// The descriptor with any password (userinfo or `password=` query
    /// parameter) replaced.
    pub fn redacted_descriptor(&self) -> String {
        let mut url = self.connect_options.database_url.clone();
        let mut changed = false;

        if url.password().is_some() {
            changed |= url.set_password(Some(REDACTED)).is_ok();
        }

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if pairs.iter().any(|(k, _)| k.eq_ignore_ascii_case("password")) {
            url.query_pairs_mut().clear().extend_pairs(pairs.iter().map(|(k, v)| {
                if k.eq_ignore_ascii_case("password") {
                    (k.as_str(), REDACTED)
                } else {
                    (k.as_str(), v.as_str())
                }
            }));
            changed = true;
        }

        if changed {
            url.to_string()
        } else {
            self.descriptor.clone()
        }
    }
}

// ====================================================
// SECTION: Connectivity Probe
// ====================================================

impl DataContext {
    /// Opens a fresh connection and pings it, within the probe timeout.
    /// Every failure is folded into the returned [`ProbeResult`].
    #[instrument(skip(self), fields(dialect = ?self.dialect))]
    pub async fn probe(&self) -> ProbeResult {
        match tokio::time::timeout(self.probe_timeout, self.open_and_ping()).await {
            Ok(Ok(())) => {
                debug!("Store reachable");
                ProbeResult::connected()
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Connectivity probe failed");
                ProbeResult::failed(e.to_string())
            }
            Err(_) => {
                warn!(timeout = ?self.probe_timeout, "Connectivity probe timed out");
                ProbeResult::failed(format!(
                    "timed out after {}s waiting for the store",
                    self.probe_timeout.as_secs_f32()
                ))
            }
        }
    }

    async fn open_and_ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = AnyConnection::connect_with(&self.connect_options).await?;
        conn.ping().await?;
        conn.close().await
    }
}

// ====================================================
// SECTION: Schema
// ====================================================

impl DataContext {
    /// Sets the schema up on first use. A failed attempt leaves the cell
    /// empty so the next caller tries again.
    pub async fn ensure_schema(&self) -> DataResult<()> {
        self.schema_ready
            .get_or_try_init(|| self.apply_schema())
            .await?;
        Ok(())
    }

    /// Creates `todo_items` and, when seeding is on, inserts the seed rows
    /// that are not there yet. Safe to run repeatedly.
    pub async fn apply_schema(&self) -> DataResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(self.dialect.create_table())
            .execute(&mut *tx)
            .await?;

        if self.seed == SeedMode::Enabled {
            let mut inserted = 0;
            for row in SEED_ROWS {
                inserted += sqlx::query(INSERT_SEED_ROW)
                    .bind(row.id)
                    .bind(row.title)
                    .bind(row.is_complete)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
            }
            if let Some(sql) = self.dialect.sync_id_sequence() {
                sqlx::query(sql).execute(&mut *tx).await?;
            }
            debug!(inserted, "Seed rows applied");
        }

        tx.commit().await?;
        info!(table = TODO_TABLE, seed = ?self.seed, "Schema ready");
        Ok(())
    }
}

fn is_in_memory(descriptor: &str) -> bool {
    let descriptor = descriptor.to_ascii_lowercase();
    descriptor.contains(":memory:") || descriptor.contains("mode=memory")
}
