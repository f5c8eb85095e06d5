//! Single database connections
//!
//! Every store operation opens its own connection and closes it when done.

use sqlx::{Connection, PgConnection};

use crate::config::StoreConfig;

/// Open one PostgreSQL connection.
///
/// # Errors
///
/// Returns an error if the server is unreachable or rejects the credentials.
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::from_env()?;
/// let conn = connect(&config).await?;
/// ```
pub async fn connect(config: &StoreConfig) -> Result<PgConnection, sqlx::Error> {
    tracing::debug!(host = %config.host, port = config.port, database = %config.database, "opening database connection");
    PgConnection::connect_with(&config.connect_options()).await
}

/// Close a connection, logging instead of failing if the close itself errors.
pub async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "failed to close database connection");
    }
}

/// Connect, ask the server for its version string and disconnect.
pub async fn server_version(config: &StoreConfig) -> Result<String, sqlx::Error> {
    let mut conn = connect(config).await?;
    let result: Result<(String,), sqlx::Error> = sqlx::query_as("SELECT version()")
        .fetch_one(&mut conn)
        .await;
    release(conn).await;
    Ok(result?.0)
}
