// File Path: src/models/mod.rs

// =========================================================================================
// SECTION 1: IMPORTS
// =========================================================================================

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

pub mod todo_item;

pub use todo_item::{TodoItem, TITLE_MAX_LEN};

// =========================================================================================
// SECTION 2: API ERROR HANDLING
// =========================================================================================

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Data(DataError::TitleTooLong(_)) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Data(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        let body = serde_json::json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

// =========================================================================================
// SECTION 3: DATA LAYER ERRORS
// =========================================================================================

pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("invalid connection descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("unsupported store `{0}`, expected postgres:// or sqlite:")]
    UnsupportedStore(String),

    #[error("SQL Server connection strings (`Server=...;`) are not supported, use a postgres:// or sqlite: URL")]
    SqlServerDescriptor,

    #[error("title is {0} characters long, the limit is {}", TITLE_MAX_LEN)]
    TitleTooLong(usize),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to decode row: {0}")]
    Decode(String),
}
