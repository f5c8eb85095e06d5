//! Database connection flags shared by every command

use anyhow::Result;
use clap::Args;
use deadlines_server::StoreConfig;

/// Connection flags; each falls back to its `DB_*` environment variable.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Database host
    #[arg(long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port
    #[arg(long = "db-port", env = "DB_PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database user
    #[arg(long = "db-user", env = "DB_USER", default_value = "postgres")]
    pub user: String,

    /// Database password
    #[arg(long = "db-password", env = "DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name (default: same as the user)
    #[arg(long = "db-name", env = "DB_NAME")]
    pub database: Option<String>,
}

impl StoreArgs {
    pub fn into_config(self) -> Result<StoreConfig> {
        let config = StoreConfig::new(
            self.host,
            self.port,
            &self.user,
            self.password,
            self.database,
        )?;
        Ok(config)
    }
}
