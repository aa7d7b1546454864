// File Path: src/api/auth.rs
//! Function Key Guard
//!
//! Enforces `health.access_level`. At the `function` level a caller must send
//! one of the configured keys, either in the `x-functions-key` header or in the
//! `code` query parameter, the same places the Functions host looks.

use std::collections::HashMap;

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::{
    api::state::AppState,
    config::AccessLevel,
    models::{ApiError, ApiResult},
};

pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";
pub const FUNCTION_KEY_QUERY: &str = "code";

pub async fn require_access(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if state.health.access_level == AccessLevel::Anonymous {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(FUNCTION_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| params.get(FUNCTION_KEY_QUERY).map(String::as_str));

    match presented {
        Some(key) if key_matches(&state.health.function_keys, key) => {}
        Some(_) => {
            warn!(path = %request.uri().path(), "Rejected request with an unknown function key");
            return Err(ApiError::Unauthorized("invalid function key".to_string()));
        }
        None => {
            return Err(ApiError::Unauthorized(format!(
                "missing function key ({FUNCTION_KEY_HEADER} header or {FUNCTION_KEY_QUERY} query parameter)"
            )))
        }
    }

    Ok(next.run(request).await)
}

fn key_matches(keys: &[String], presented: &str) -> bool {
    !presented.is_empty()
        && keys
            .iter()
            .any(|key| key.as_bytes().ct_eq(presented.as_bytes()).into())
}
