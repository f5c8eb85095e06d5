//! Command implementations for the deadlines CLI

pub mod ping;
pub mod serve;
pub mod store_args;

pub use ping::run_ping;
pub use serve::run_serve;
