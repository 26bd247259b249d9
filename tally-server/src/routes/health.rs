//! Service banner and database health probe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use tally_core::TallyError;

use crate::state::AppState;

/// GET / - service banner
async fn index() -> Json<Value> {
    Json(json!({
        "message": "tally: revenue and production figures API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - connectivity probe
///
/// Runs `SELECT 1` so a wedged pool reports unhealthy, not just a closed
/// one.
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match probe(&state).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": "disconnected" })),
            )
        }
    }
}

async fn probe(state: &AppState) -> tally_core::Result<i32> {
    let pool = state.db.pool().await?;
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(TallyError::Connection)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn banner_reports_the_package_version() {
        let Json(body) = index().await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
