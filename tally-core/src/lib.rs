//! tally-core: the paginated query engine behind the tally API.
//!
//! Turns a small set of untrusted pagination/date parameters into a
//! parameterized page/count statement pair, executes the pair concurrently
//! against a shared connection pool, and derives pagination metadata from
//! the count. HTTP wiring, authentication and response shaping live in
//! `tally-server`; this crate never formats user-facing text.

pub mod db;
pub mod error;
pub mod fetch;
pub mod params;
pub mod query;
pub mod source;
pub mod timeout;

pub use db::{Db, DbConfig};
pub use error::{Result, TallyError};
pub use fetch::{fetch_page, total_pages, Page};
pub use params::{sanitize, Bound, PageRequest, RawPageParams};
pub use query::{build, DateFilter, PageQuery, SortOrder};
pub use source::{DataSource, SchemaName, TableRef};
pub use timeout::TimeoutPolicy;
