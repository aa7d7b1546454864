// File Path: src/models/todo_item.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters a title may hold, enforced by the store.
pub const TITLE_MAX_LEN: usize = 200;

/// One row of the `todo_items` table.
///
/// `created_at` is stamped with the process clock by [`TodoItem::new`], but
/// that value never reaches the store: inserts leave the column to its
/// default and the persisted row carries the store's UTC time instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            is_complete: false,
            created_at: Utc::now(),
        }
    }
}
