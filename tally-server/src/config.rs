//! Environment-based server configuration.
//!
//! Variables:
//! - `DATABASE_URL`            Postgres connection string (required)
//! - `API_SECRET_KEY`          shared secret for the `x-api-key` gate;
//!                             unset disables the gate
//! - `DB_SCHEMA`               schema holding the figure tables (default: public)
//! - `BIND_ADDRESS`            listen address (default: 127.0.0.1)
//! - `PORT`                    listen port (default: 3000)
//! - `DB_MAX_CONNECTIONS`      pool size (default: 10)
//! - `DB_ACQUIRE_TIMEOUT_SECS` pool checkout timeout (default: 30)

use std::net::SocketAddr;
use std::time::Duration;

use tally_core::{DbConfig, Result, SchemaName, TallyError};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db: DbConfig,
    pub schema: SchemaName,
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| TallyError::config("DATABASE_URL must be set"))?;

        let host = env_or("BIND_ADDRESS", "127.0.0.1");
        let port: u16 = parse_env("PORT", 3000)?;
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| TallyError::config(format!("invalid bind address '{host}:{port}'")))?;

        let schema = SchemaName::new(&env_or("DB_SCHEMA", "public"))?;

        let api_key = std::env::var("API_SECRET_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let mut db = DbConfig::new(database_url);
        db.max_connections = parse_env("DB_MAX_CONNECTIONS", db.max_connections)?;
        db.acquire_timeout = Duration::from_secs(parse_env("DB_ACQUIRE_TIMEOUT_SECS", 30)?);

        Ok(Self {
            bind_addr,
            db,
            schema,
            api_key,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// A set-but-unparseable numeric variable is a hard error rather than a
/// silent default.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            TallyError::config(format!("{name} must be a number, got '{raw}'"))
        }),
        _ => Ok(default),
    }
}
