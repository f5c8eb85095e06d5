//! deadlines CLI - runs the deadline tracking service
//!
//! Subcommands:
//! - `serve`: HTTP API over the `deadlines` table
//! - `ping`: check that the configured database is reachable
//!
//! Settings can come from flags, the environment, or a `.env` file in the
//! working directory.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "deadlines",
    author,
    version,
    about = "Per-user deadline tracking service backed by PostgreSQL"
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Connect to the database and print its version
    Ping(commands::ping::PingArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before parsing so clap's env fallbacks see .env values
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Ping(args) => commands::run_ping(args).await?,
    }

    Ok(())
}
