//! Route handlers organized by resource

pub mod deadlines;
pub mod health;
