//! Trusted identification of the queryable data sources.
//!
//! Postgres has no placeholder syntax for identifiers, so table and column
//! names are interpolated directly into statement text. Every component
//! therefore comes from this closed allow-list, never from request input.

use crate::error::{Result, TallyError};

/// Logical data sources exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Revenue ledger entries
    Revenue,
    /// Production output figures
    Production,
}

impl DataSource {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue_entries",
            Self::Production => "production_entries",
        }
    }

    /// Column the date filter and the primary sort apply to.
    pub fn date_column(&self) -> &'static str {
        "modified"
    }

    /// Tie-break key for pagination; `modified` is not unique.
    pub fn key_column(&self) -> &'static str {
        "id"
    }
}

/// Validated schema identifier.
///
/// The schema is the only identifier that comes from configuration rather
/// than a compile-time constant, so it is checked once here, at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaName(String);

impl SchemaName {
    /// Accepts `[A-Za-z_][A-Za-z0-9_]*`, at most 63 bytes (the Postgres
    /// identifier limit).
    pub fn new(name: &str) -> Result<Self> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid = valid_start
            && name.len() <= 63
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid {
            return Err(TallyError::config(format!(
                "'{name}' is not a valid schema identifier"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fully trusted reference to one table: schema, table, date column and
/// tie-break key, ready for identifier interpolation.
#[derive(Debug, Clone)]
pub struct TableRef {
    schema: SchemaName,
    source: DataSource,
}

impl TableRef {
    pub fn new(schema: SchemaName, source: DataSource) -> Self {
        Self { schema, source }
    }

    /// `"schema"."table"`, double-quoted.
    pub fn qualified(&self) -> String {
        format!("\"{}\".\"{}\"", self.schema.as_str(), self.source.table())
    }

    pub fn date_column(&self) -> &'static str {
        self.source.date_column()
    }

    pub fn key_column(&self) -> &'static str {
        self.source.key_column()
    }
}
