//! Deadline store trait definitions.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Deadline, DeadlineId, DeadlineUpdate, NewDeadline};

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No connection could be opened; nothing was executed.
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),

    /// A statement failed after the connection was obtained.
    #[error("database error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Data access for the `deadlines` table.
///
/// Implementations hold no per-request state. `today` is always passed in
/// so the past/current views can be evaluated against any date.
#[async_trait]
pub trait DeadlineStore: Send + Sync {
    /// Every deadline of a user, in store order.
    async fn list_all(&self, user_id: &str) -> Result<Vec<Deadline>, StoreError>;

    /// Overdue or completed deadlines, latest date first.
    async fn list_past(&self, user_id: &str, today: NaiveDate)
        -> Result<Vec<Deadline>, StoreError>;

    /// Incomplete deadlines due today or later, soonest first.
    async fn list_current(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Deadline>, StoreError>;

    /// Insert a new, incomplete deadline.
    async fn add(&self, deadline: &NewDeadline) -> Result<(), StoreError>;

    /// Delete by id without an ownership check. Returns the affected row count.
    async fn delete(&self, id: DeadlineId) -> Result<u64, StoreError>;

    /// Apply the present fields of `changes` to one deadline.
    async fn update(&self, id: DeadlineId, changes: &DeadlineUpdate) -> Result<(), StoreError>;

    /// Set the completed flag. Returns the affected row count.
    async fn set_completed(&self, id: DeadlineId, completed: bool) -> Result<u64, StoreError>;
}
