//! deadlines-server: per-user deadline tracking over HTTP
//!
//! A stateless axum service over a single PostgreSQL table. Each request
//! opens one connection, runs its statement(s) and closes it again.

pub mod clock;
pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StoreConfig};
pub use db::{DeadlineStore, MemoryDeadlineStore, PgDeadlineStore, StoreError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
