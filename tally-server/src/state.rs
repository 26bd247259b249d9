//! Shared application state.

use std::sync::Arc;

use tally_core::{Db, SchemaName, TimeoutPolicy};

/// State shared by every handler. Cheap to clone; the pool handle sits
/// behind an `Arc` and is owned by the process entry point.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Db>,
    pub schema: SchemaName,
    pub api_key: Option<String>,
    pub timeouts: TimeoutPolicy,
}
