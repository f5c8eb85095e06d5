//! In-memory deadline store for testing.
//!
//! Mirrors the PostgreSQL store: serial ids starting at 1, the same view
//! predicates and orderings, and the same affected-row counts.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::store::{DeadlineStore, StoreError};
use crate::models::{Deadline, DeadlineId, DeadlineUpdate, NewDeadline};

/// Failure to inject into every subsequent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// Behave as if the database were unreachable.
    Connect,
    /// Connect fine, then fail the statement.
    Query,
}

impl StoreFault {
    fn to_error(self) -> StoreError {
        match self {
            Self::Connect => StoreError::Connect(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "in-memory store is offline",
            ))),
            Self::Query => StoreError::Query(sqlx::Error::Protocol(
                "in-memory store rejected the statement".into(),
            )),
        }
    }
}

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: Vec<Deadline>,
}

/// In-memory deadline store for testing purposes.
#[derive(Debug, Default, Clone)]
pub struct MemoryDeadlineStore {
    table: Arc<RwLock<Table>>,
    fault: Arc<RwLock<Option<StoreFault>>>,
}

impl MemoryDeadlineStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following operation fail, or recover with `None`.
    pub async fn set_fault(&self, fault: Option<StoreFault>) {
        *self.fault.write().await = fault;
    }

    /// Look up a row directly, bypassing fault injection.
    pub async fn get(&self, id: i32) -> Option<Deadline> {
        self.table
            .read()
            .await
            .rows
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    async fn check(&self) -> Result<(), StoreError> {
        match *self.fault.read().await {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }

    async fn select<F>(&self, user_id: &str, keep: F) -> Result<Vec<Deadline>, StoreError>
    where
        F: Fn(&Deadline) -> bool + Send,
    {
        self.check().await?;
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|d| d.user_id == user_id && keep(d))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DeadlineStore for MemoryDeadlineStore {
    async fn list_all(&self, user_id: &str) -> Result<Vec<Deadline>, StoreError> {
        self.select(user_id, |_| true).await
    }

    async fn list_past(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Deadline>, StoreError> {
        let mut rows = self.select(user_id, |d| d.is_past(today)).await?;
        rows.sort_by(|a, b| b.deadline_date.cmp(&a.deadline_date));
        Ok(rows)
    }

    async fn list_current(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Deadline>, StoreError> {
        let mut rows = self.select(user_id, |d| d.is_current(today)).await?;
        rows.sort_by_key(|d| d.deadline_date);
        Ok(rows)
    }

    async fn add(&self, deadline: &NewDeadline) -> Result<(), StoreError> {
        self.check().await?;
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.push(Deadline {
            id,
            user_id: deadline.user_id.clone(),
            task: deadline.task.clone(),
            deadline_date: deadline.deadline_date,
            completed: false,
        });
        Ok(())
    }

    async fn delete(&self, id: DeadlineId) -> Result<u64, StoreError> {
        self.check().await?;
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|d| d.id != id.get());
        Ok((before - table.rows.len()) as u64)
    }

    async fn update(&self, id: DeadlineId, changes: &DeadlineUpdate) -> Result<(), StoreError> {
        self.check().await?;
        let mut table = self.table.write().await;
        if let Some(row) = table.rows.iter_mut().find(|d| d.id == id.get()) {
            if let Some(task) = &changes.task {
                row.task = task.clone();
            }
            if let Some(date) = changes.deadline_date {
                row.deadline_date = date;
            }
        }
        Ok(())
    }

    async fn set_completed(&self, id: DeadlineId, completed: bool) -> Result<u64, StoreError> {
        self.check().await?;
        let mut table = self.table.write().await;
        let mut affected = 0;
        for row in table.rows.iter_mut().filter(|d| d.id == id.get()) {
            row.completed = completed;
            affected += 1;
        }
        Ok(affected)
    }
}
