use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::{Db, TimeoutPolicy};
use tally_server::{AppState, ServerConfig};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to bind the HTTP server to, overriding PORT
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env().context("loading configuration")?;
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }
    tracing::info!(schema = config.schema.as_str(), "configuration loaded");

    let state = Arc::new(AppState {
        db: Arc::new(Db::new(config.db.clone())),
        schema: config.schema.clone(),
        api_key: config.api_key.clone(),
        timeouts: TimeoutPolicy::default(),
    });

    tally_server::serve(&config, state)
        .await
        .context("server failed")
}
