//! Shared-secret authentication gate.
//!
//! Requests reach the data routes only with an `x-api-key` header equal to
//! the configured secret. The check runs before any core logic; `/` and
//! `/health` are mounted outside this layer.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    check_api_key(state.api_key.as_deref(), provided)?;
    Ok(next.run(request).await)
}

/// Authorized iff the provided key equals the configured secret. An
/// unconfigured secret disables the gate (dev mode; `serve` warns once at
/// startup).
fn check_api_key(expected: Option<&str>, provided: Option<&str>) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    match provided.map(str::trim).filter(|key| !key.is_empty()) {
        Some(key) if key == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
