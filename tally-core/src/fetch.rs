//! Concurrent execution of the statement pair.
//!
//! The page and count statements run as two independent futures against the
//! shared pool. Each checks its own connection out; they never share a
//! handle, because their bound parameters differ even though the filter
//! predicates are identical. The join is all-or-nothing: a failure or
//! timeout on either side fails the whole fetch, so a page is never
//! returned without its count.

use std::time::Duration;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use tokio::time::timeout;

use crate::error::{Result, TallyError};
use crate::query::PageQuery;
use crate::timeout::TimeoutPolicy;

/// One page of rows plus count-derived pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
}

/// `ceil(total / limit)`, zero when nothing matches.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// Run the page and count statements concurrently and assemble the result.
///
/// The two results are read at whatever isolation the backing store
/// provides; `total` may be stale relative to `rows` under concurrent
/// writes. There is no internal retry.
pub async fn fetch_page<T>(
    pool: &PgPool,
    query: &PageQuery,
    timeouts: &TimeoutPolicy,
) -> Result<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let budget = timeouts.for_offset(query.offset);
    tracing::debug!(
        page = query.page,
        limit = query.limit,
        offset = query.offset,
        budget_secs = budget.as_secs(),
        "executing statement pair"
    );

    let (rows, total) = tokio::try_join!(
        run_page_statement::<T>(pool, query, budget),
        run_count_statement(pool, query, budget),
    )?;

    Ok(Page {
        current_page: query.page,
        total_pages: total_pages(total, query.limit),
        total,
        rows,
    })
}

async fn run_page_statement<T>(pool: &PgPool, query: &PageQuery, budget: Duration) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let (start, end) = query.filter.bounds();
    let mut stmt = sqlx::query_as::<_, T>(&query.page_sql);
    if let Some(start) = start {
        stmt = stmt.bind(start);
    }
    if let Some(end) = end {
        stmt = stmt.bind(end);
    }
    stmt = stmt.bind(query.limit).bind(query.offset);

    timeout(budget, stmt.fetch_all(pool))
        .await
        .map_err(|_| TallyError::Timeout { after: budget })?
        .map_err(classify)
}

async fn run_count_statement(pool: &PgPool, query: &PageQuery, budget: Duration) -> Result<i64> {
    let (start, end) = query.filter.bounds();
    let mut stmt = sqlx::query_scalar::<_, i64>(&query.count_sql);
    if let Some(start) = start {
        stmt = stmt.bind(start);
    }
    if let Some(end) = end {
        stmt = stmt.bind(end);
    }

    timeout(budget, stmt.fetch_one(pool))
        .await
        .map_err(|_| TallyError::Timeout { after: budget })?
        .map_err(classify)
}

/// Pool exhaustion is a connectivity fault; everything else is an
/// execution fault.
fn classify(err: sqlx::Error) -> TallyError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => TallyError::Connection(err),
        other => TallyError::Query(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PageRequest;
    use crate::query::{build, SortOrder};
    use crate::source::{DataSource, SchemaName, TableRef};

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(250, 100), 3);
        assert_eq!(total_pages(100, 100), 1);
        assert_eq!(total_pages(101, 100), 2);
        assert_eq!(total_pages(1, 1), 1);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        assert_eq!(total_pages(0, 100), 0);
    }

    // Integration tests need a real database.
    // Run with: DATABASE_URL=postgres://... cargo test -p tally-core -- --ignored

    #[derive(Debug, sqlx::FromRow)]
    struct ProbeRow {
        id: i64,
        modified: chrono::DateTime<chrono::Utc>,
    }

    async fn scratch_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        sqlx::query("CREATE SCHEMA IF NOT EXISTS tally_scratch")
            .execute(&pool)
            .await
            .expect("schema creation failed");
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tally_scratch.production_entries (
                id BIGINT PRIMARY KEY,
                modified TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .expect("table creation failed");
        sqlx::query("TRUNCATE tally_scratch.production_entries")
            .execute(&pool)
            .await
            .expect("truncate failed");
        pool
    }

    fn scratch_table() -> TableRef {
        TableRef::new(
            SchemaName::new("tally_scratch").unwrap(),
            DataSource::Production,
        )
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn fetches_a_page_with_its_count() {
        let pool = scratch_pool().await;
        for id in 1..=5i64 {
            sqlx::query("INSERT INTO tally_scratch.production_entries (id, modified) VALUES ($1, NOW())")
                .bind(id)
                .execute(&pool)
                .await
                .expect("insert failed");
        }

        let req = PageRequest {
            limit: 2,
            page: 2,
            start: None,
            end: None,
        };
        let query = build(&scratch_table(), SortOrder::Ascending, &req);
        let page = fetch_page::<ProbeRow>(&pool, &query, &TimeoutPolicy::default())
            .await
            .expect("fetch failed");

        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].id, 3);
        assert_eq!(page.rows[1].id, 4);
        assert!(page.rows[0].modified <= chrono::Utc::now());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn count_failure_fails_the_whole_fetch() {
        let pool = scratch_pool().await;

        let req = PageRequest {
            limit: 100,
            page: 1,
            start: None,
            end: None,
        };
        let mut query = build(&scratch_table(), SortOrder::Ascending, &req);
        query.count_sql =
            "SELECT COUNT(*) FROM \"tally_scratch\".\"no_such_table\" WHERE TRUE".to_string();

        let err = fetch_page::<ProbeRow>(&pool, &query, &TimeoutPolicy::default())
            .await
            .expect_err("fetch should fail");
        assert!(matches!(err, TallyError::Query(_)));
    }
}
