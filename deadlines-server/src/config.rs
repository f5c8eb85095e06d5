//! Store configuration - connection parameters and environment loading
//!
//! Configuration is loaded from environment variables:
//! - `DB_HOST`: database host (default: localhost)
//! - `DB_PORT`: database port (default: 5432)
//! - `DB_USER`: database user (default: postgres)
//! - `DB_PASSWORD`: password (optional)
//! - `DB_NAME`: database name (default: same as `DB_USER`)

use std::fmt;

use sqlx::postgres::PgConnectOptions;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_USER: &str = "postgres";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid DB_PORT '{value}': expected a port number")]
    InvalidPort { value: String },

    #[error("database user is empty; set DB_USER or --db-user")]
    MissingUser,
}

/// Connection parameters for the deadlines database
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
}

impl StoreConfig {
    /// Build a config from its parts.
    ///
    /// The user is trimmed and must not be blank; `database` defaults to
    /// the user.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: &str,
        password: Option<String>,
        database: Option<String>,
    ) -> Result<Self, ConfigError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(ConfigError::MissingUser);
        }

        Ok(Self {
            host: host.into(),
            port,
            user: user.to_string(),
            password,
            database: database.unwrap_or_else(|| user.to_string()),
        })
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("DB_PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };
        let user = lookup("DB_USER").unwrap_or_else(|| DEFAULT_USER.to_string());

        Self::new(
            lookup("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            &user,
            lookup("DB_PASSWORD"),
            lookup("DB_NAME"),
        )
    }

    /// sqlx connect options for a single connection
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .application_name(env!("CARGO_PKG_NAME"));

        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}
