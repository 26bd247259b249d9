//! Revenue figures endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use tally_core::{build, fetch_page, sanitize, DataSource, RawPageParams, SortOrder, TableRef};

use crate::error::ApiError;
use crate::models::{PageEnvelope, RevenueRecord};
use crate::state::AppState;

/// GET /api/revenue
///
/// Newest entries first. `startDate`/`endDate` bound the `modified`
/// column; `limit`/`page` select the page.
async fn list_revenue(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawPageParams>,
) -> Result<Json<PageEnvelope<RevenueRecord>>, ApiError> {
    let request = sanitize(&params)?;
    let table = TableRef::new(state.schema.clone(), DataSource::Revenue);
    let query = build(&table, SortOrder::Descending, &request);

    let pool = state.db.pool().await?;
    let page = fetch_page::<RevenueRecord>(pool, &query, &state.timeouts).await?;
    Ok(Json(page.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/revenue", get(list_revenue))
}
