// File Path: src/services/todo_items.rs

//! Queries over `todo_items`. Every entry point makes sure the schema exists first.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{any::AnyRow, Row};

use crate::{
    models::{DataError, DataResult, TodoItem, TITLE_MAX_LEN},
    services::data_context::DataContext,
};

impl DataContext {
    pub async fn list_todo_items(&self) -> DataResult<Vec<TodoItem>> {
        self.ensure_schema().await?;

        let rows = sqlx::query(
            "SELECT id, title, is_complete, CAST(created_at AS TEXT) AS created_at \
             FROM todo_items ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(todo_from_row).collect()
    }

    pub async fn find_todo_item(&self, id: i64) -> DataResult<Option<TodoItem>> {
        self.ensure_schema().await?;

        let row = sqlx::query(
            "SELECT id, title, is_complete, CAST(created_at AS TEXT) AS created_at \
             FROM todo_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(todo_from_row).transpose()
    }

    /// Persists `item` and returns the stored row. `id` and `created_at` on
    /// the argument are ignored: the store assigns both.
    pub async fn insert_todo_item(&self, item: &TodoItem) -> DataResult<TodoItem> {
        let length = item.title.chars().count();
        if length > TITLE_MAX_LEN {
            return Err(DataError::TitleTooLong(length));
        }

        self.ensure_schema().await?;

        let row = sqlx::query(
            "INSERT INTO todo_items (title, is_complete) VALUES ($1, $2) \
             RETURNING id, title, is_complete, CAST(created_at AS TEXT) AS created_at",
        )
        .bind(item.title.as_str())
        .bind(item.is_complete)
        .fetch_one(self.pool())
        .await?;

        todo_from_row(&row)
    }
}

fn todo_from_row(row: &AnyRow) -> DataResult<TodoItem> {
    let created_at: String = row.try_get("created_at")?;

    Ok(TodoItem {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        is_complete: decode_flag(row, "is_complete")?,
        created_at: parse_store_timestamp(&created_at)?,
    })
}

// SQLite hands booleans back as plain integers.
fn decode_flag(row: &AnyRow, column: &str) -> DataResult<bool> {
    match row.try_get::<bool, _>(column) {
        Ok(flag) => Ok(flag),
        Err(_) => Ok(row.try_get::<i64, _>(column)? != 0),
    }
}

/// Parses the text form of a store timestamp (always UTC, no offset).
fn parse_store_timestamp(raw: &str) -> DataResult<DateTime<Utc>> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| DataError::Decode(format!("created_at `{raw}`: {e}")))
}
