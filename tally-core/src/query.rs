//! Builds the paginated statement pair.
//!
//! Identifiers come only from [`TableRef`]; every value binds as a numbered
//! placeholder. Both statements are assembled in one pass over the filter
//! so the count is always computed over the same predicate set as the page.

use chrono::{DateTime, Utc};

use crate::params::PageRequest;
use crate::source::TableRef;

/// Date-range predicate applied to both statements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateFilter {
    Unbounded,
    From(DateTime<Utc>),
    Until(DateTime<Utc>),
    Range(DateTime<Utc>, DateTime<Utc>),
}

impl DateFilter {
    pub fn from_bounds(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        match (start, end) {
            (None, None) => Self::Unbounded,
            (Some(s), None) => Self::From(s),
            (None, Some(e)) => Self::Until(e),
            (Some(s), Some(e)) => Self::Range(s, e),
        }
    }

    /// Bound values in placeholder order: start first, then end.
    pub fn bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match *self {
            Self::Unbounded => (None, None),
            Self::From(s) => (Some(s), None),
            Self::Until(e) => (None, Some(e)),
            Self::Range(s, e) => (Some(s), Some(e)),
        }
    }
}

/// Sort direction of the page statement. Chosen per endpoint, never by the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// One built statement pair plus everything needed to bind and page it.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub page_sql: String,
    pub count_sql: String,
    pub filter: DateFilter,
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Build the page and count statements for one sanitized request.
///
/// The page statement orders by the date column with the key column as a
/// stable tie-break, so repeated calls with the same page/limit return the
/// same rows in the same order even when dates collide. The count statement
/// carries the same WHERE clause and nothing else.
pub fn build(table: &TableRef, order: SortOrder, req: &PageRequest) -> PageQuery {
    let filter = DateFilter::from_bounds(req.start, req.end);
    let relation = table.qualified();
    let date_col = table.date_column();

    // WHERE TRUE keeps clause concatenation uniform regardless of which
    // optional predicates are present.
    let mut page_sql = format!("SELECT * FROM {relation} WHERE TRUE");
    let mut count_sql = format!("SELECT COUNT(*) FROM {relation} WHERE TRUE");

    let (start, end) = filter.bounds();
    let mut next_param = 1;
    if start.is_some() {
        let predicate = format!(" AND \"{date_col}\" >= ${next_param}");
        page_sql.push_str(&predicate);
        count_sql.push_str(&predicate);
        next_param += 1;
    }
    if end.is_some() {
        let predicate = format!(" AND \"{date_col}\" <= ${next_param}");
        page_sql.push_str(&predicate);
        count_sql.push_str(&predicate);
        next_param += 1;
    }

    page_sql.push_str(&format!(
        " ORDER BY \"{date_col}\" {dir}, \"{key}\" ASC LIMIT ${limit_param} OFFSET ${offset_param}",
        dir = order.as_sql(),
        key = table.key_column(),
        limit_param = next_param,
        offset_param = next_param + 1,
    ));

    PageQuery {
        page_sql,
        count_sql,
        filter,
        page: req.page,
        limit: req.limit,
        offset: req.offset(),
    }
}
