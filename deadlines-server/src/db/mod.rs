//! Database layer - store trait and its implementations
//!
//! # Design Principles
//!
//! - One connection per operation, closed on every exit path - no pool
//! - Parameterized queries only
//! - Rows decoded by column name
//! - Transactions for multi-step operations

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod store;

pub use connection::{connect, server_version};
pub use memory::{MemoryDeadlineStore, StoreFault};
pub use postgres::PgDeadlineStore;
pub use store::{DeadlineStore, StoreError};
