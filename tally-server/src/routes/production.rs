//! Production figures endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use tally_core::{build, fetch_page, sanitize, DataSource, RawPageParams, SortOrder, TableRef};

use crate::error::ApiError;
use crate::models::{PageEnvelope, ProductionRecord};
use crate::state::AppState;

/// GET /api/production
///
/// Oldest entries first, so a consumer walking the pages sees output in
/// the order it was recorded.
async fn list_production(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawPageParams>,
) -> Result<Json<PageEnvelope<ProductionRecord>>, ApiError> {
    let request = sanitize(&params)?;
    let table = TableRef::new(state.schema.clone(), DataSource::Production);
    let query = build(&table, SortOrder::Ascending, &request);

    let pool = state.db.pool().await?;
    let page = fetch_page::<ProductionRecord>(pool, &query, &state.timeouts).await?;
    Ok(Json(page.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/production", get(list_production))
}
