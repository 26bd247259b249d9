//! API error type mapping core failures onto HTTP responses.
//!
//! The core returns typed errors and never shapes user-facing text; the
//! status mapping and the failure envelope live here, and server-side
//! faults are logged at this boundary only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use tally_core::TallyError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or mismatched shared secret (401)
    #[error("missing or invalid API secret key")]
    Unauthorized,

    /// Anything surfaced by the query engine
    #[error(transparent)]
    Core(#[from] TallyError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Core(TallyError::InvalidDate { .. }) => StatusCode::BAD_REQUEST,
            Self::Core(TallyError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            // A timeout fails the whole fetch like any other execution fault
            Self::Core(
                TallyError::Query(_) | TallyError::Timeout { .. } | TallyError::Config { .. },
            ) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Core(TallyError::InvalidDate { .. }) => "InvalidInput",
            Self::Core(TallyError::Connection(_)) => "ConnectionUnavailable",
            Self::Core(_) => "QueryExecutionError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "success": false,
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
