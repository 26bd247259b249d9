//! Wire types: database records and response envelopes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use tally_core::Page;

/// One revenue ledger row.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRecord {
    pub id: i64,
    pub entry_no: String,
    pub department: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub modified: DateTime<Utc>,
}

/// One production output row.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub id: i64,
    pub product_code: String,
    pub quantity: f64,
    pub unit: String,
    pub line: Option<String>,
    pub modified: DateTime<Utc>,
}

/// Success envelope for one fetched page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub success: bool,
    pub count: usize,
    pub current_page: i64,
    pub total_pages: i64,
    pub data: Vec<T>,
}

impl<T> From<Page<T>> for PageEnvelope<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            count: page.rows.len(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            data: page.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_uses_camel_case_keys() {
        let page = Page {
            rows: vec!["a", "b"],
            current_page: 2,
            total_pages: 3,
            total: 250,
        };
        let envelope = PageEnvelope::from(page);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "count": 2,
                "currentPage": 2,
                "totalPages": 3,
                "data": ["a", "b"],
            })
        );
    }

    #[test]
    fn count_is_the_page_size_not_the_total() {
        let page: Page<i32> = Page {
            rows: vec![1, 2, 3],
            current_page: 3,
            total_pages: 3,
            total: 203,
        };
        let envelope = PageEnvelope::from(page);
        assert_eq!(envelope.count, 3);
    }

    #[test]
    fn records_serialize_with_camel_case_fields() {
        let record = ProductionRecord {
            id: 7,
            product_code: "PC-100".to_string(),
            quantity: 12.5,
            unit: "t".to_string(),
            line: None,
            modified: chrono::Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("productCode").is_some());
        assert!(value.get("product_code").is_none());
    }
}
