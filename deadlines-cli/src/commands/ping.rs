//! Database connectivity check
//!
//! Opens one connection with the same settings `serve` would use, prints the
//! server version and closes it.

use anyhow::{Context, Result};
use clap::Parser;

use deadlines_server::db::server_version;

use super::store_args::StoreArgs;

/// Arguments for the ping command
#[derive(Parser, Debug)]
pub struct PingArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run_ping(args: PingArgs) -> Result<()> {
    let config = args.store.into_config()?;

    let version = server_version(&config).await.with_context(|| {
        format!(
            "Failed to connect to {}:{}/{} as {}",
            config.host, config.port, config.database, config.user
        )
    })?;

    tracing::debug!("Database connection closed");
    println!("Connected to {}", version);
    Ok(())
}
