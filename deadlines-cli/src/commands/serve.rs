//! HTTP server command for the deadlines API
//!
//! Runs the deadline service until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use deadlines_server::{run_server, AppState, PgDeadlineStore, ServerConfig};

use super::store_args::StoreArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "DEADLINES_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store_config = args.store.into_config()?;
    tracing::info!(
        host = %store_config.host,
        port = store_config.port,
        database = %store_config.database,
        "Using deadlines database"
    );

    let state = AppState::new(PgDeadlineStore::new(store_config));
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
