//! tally CLI - entry point for the figures API server.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod serve;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Read-only paginated API over revenue and production figures"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init_tracing(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
    }
}
