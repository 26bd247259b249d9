//! Sanitizes untrusted pagination and date-range parameters.
//!
//! Numeric parameters never fail: missing or unparseable values fall back
//! to defaults and out-of-range values are clamped, so naive callers keep
//! working while the worst-case result size stays bounded. Dates are the
//! exception: a supplied date that does not parse is a caller error, not
//! something to drop silently.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::{Result, TallyError};

/// Page size when `limit` is missing or unparseable.
const DEFAULT_LIMIT: i64 = 100;

/// Hard cap on page size; larger requests are capped, not rejected.
const MAX_LIMIT: i64 = 10_000;

/// Raw query parameters as they arrive off the wire. Everything stays a
/// string until `sanitize` has looked at it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPageParams {
    pub limit: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// Sanitized, immutable input to one paginated fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub limit: i64,
    pub page: i64,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl PageRequest {
    /// Row offset of the first row on this page. Only meaningful after the
    /// clamping in [`sanitize`].
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Which end of the range a date bound sits on; decides how a bare
/// calendar date is widened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// Validate and clamp one set of raw parameters.
pub fn sanitize(raw: &RawPageParams) -> Result<PageRequest> {
    let limit = parse_or(raw.limit.as_deref(), DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let page = parse_or(raw.page.as_deref(), 1).max(1);

    let start = raw
        .start_date
        .as_deref()
        .map(|s| parse_date_bound(s, Bound::Lower))
        .transpose()?;
    let end = raw
        .end_date
        .as_deref()
        .map(|s| parse_date_bound(s, Bound::Upper))
        .transpose()?;

    Ok(PageRequest {
        limit,
        page,
        start,
        end,
    })
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Parse one date bound.
///
/// A value carrying a time component passes through unchanged. A bare
/// calendar date widens to start-of-day as a lower bound and end-of-day as
/// an upper bound, so `endDate=2024-01-31` still matches rows from that
/// day.
pub fn parse_date_bound(value: &str, bound: Bound) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if trimmed.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&Utc));
        }
        return trimmed
            .parse::<NaiveDateTime>()
            .map(|dt| dt.and_utc())
            .map_err(|e| TallyError::invalid_date(value, e.to_string()));
    }

    let date = trimmed
        .parse::<NaiveDate>()
        .map_err(|e| TallyError::invalid_date(value, e.to_string()))?;
    let datetime = match bound {
        Bound::Lower => date.and_hms_opt(0, 0, 0),
        Bound::Upper => date.and_hms_opt(23, 59, 59),
    };
    // and_hms_opt only fails on out-of-range components, which are fixed here
    Ok(datetime.expect("time components in range").and_utc())
}
