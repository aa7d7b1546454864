// File Path: src/services/schema.rs

//! # Schema
//!
//! Table layout for `todo_items` and the canonical seed rows, per store dialect.

use crate::models::{DataError, DataResult};

pub const TODO_TABLE: &str = "todo_items";

/// Seed insert shared by both dialects; a row that already exists is left alone.
pub const INSERT_SEED_ROW: &str = "INSERT INTO todo_items (id, title, is_complete) \
     VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING";

/// A row inserted while the schema is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRow {
    pub id: i64,
    pub title: &'static str,
    pub is_complete: bool,
}

pub const SEED_ROWS: [SeedRow; 2] = [
    SeedRow { id: 1, title: "Sample Task 1", is_complete: false },
    SeedRow { id: 2, title: "Sample Task 2", is_complete: true },
];

/// Whether schema setup also inserts [`SEED_ROWS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    Enabled,
    Disabled,
}

impl From<bool> for SeedMode {
    fn from(enabled: bool) -> Self {
        if enabled { SeedMode::Enabled } else { SeedMode::Disabled }
    }
}

/// SQL flavour of the configured store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Picks the dialect from the descriptor's URL scheme.
    pub fn detect(descriptor: &str) -> DataResult<Self> {
        if is_ado_descriptor(descriptor) {
            return Err(DataError::SqlServerDescriptor);
        }

        let scheme = descriptor
            .split_once(':')
            .map(|(scheme, _)| scheme.trim().to_ascii_lowercase())
            .ok_or_else(|| DataError::InvalidDescriptor("missing URL scheme".to_string()))?;

        match scheme.as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            _ => Err(DataError::UnsupportedStore(scheme)),
        }
    }

    pub fn create_table(self) -> &'static str {
        match self {
            Dialect::Postgres => {
                "CREATE TABLE IF NOT EXISTS todo_items (
                    id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                    title VARCHAR(200) NOT NULL CHECK (char_length(title) <= 200),
                    is_complete BOOLEAN NOT NULL,
                    created_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'utc')
                )"
            }
            // The `Any` driver cannot decode SQLite BOOLEAN columns, so the flag is 0/1.
            Dialect::Sqlite => {
                "CREATE TABLE IF NOT EXISTS todo_items (
                    id INTEGER PRIMARY KEY,
                    title VARCHAR(200) NOT NULL CHECK (length(title) <= 200),
                    is_complete INTEGER NOT NULL CHECK (is_complete IN (0, 1)),
                    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
                )"
            }
        }
    }

    /// Statement run after explicit-id inserts so generated ids don't collide.
    pub fn sync_id_sequence(self) -> Option<&'static str> {
        match self {
            Dialect::Postgres => Some(
                "SELECT setval(pg_get_serial_sequence('todo_items', 'id'), \
                 (SELECT COALESCE(MAX(id), 1) FROM todo_items))",
            ),
            // INTEGER PRIMARY KEY already allocates past the current maximum
            Dialect::Sqlite => None,
        }
    }
}

/// True for ADO.NET style `Key=Value;...` strings (`Server=tcp:host,1433;Database=...`).
fn is_ado_descriptor(descriptor: &str) -> bool {
    let first = descriptor.trim().split(';').next().unwrap_or_default();
    match first.split_once('=') {
        Some((key, _)) => {
            let key = key.trim();
            !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_')
        }
        None => false,
    }
}
