//! PostgreSQL deadline store
//!
//! Each operation:
//! - opens one connection (failure -> `StoreError::Connect`, nothing executed)
//! - runs its statement(s)
//! - closes the connection whether or not the statements succeeded

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Connection, PgConnection};

use super::connection::{connect, release};
use super::store::{DeadlineStore, StoreError};
use crate::config::StoreConfig;
use crate::models::{Deadline, DeadlineId, DeadlineUpdate, NewDeadline};

const LIST_ALL: &str = r#"
    SELECT id, userid, task, deadline, completed
    FROM deadlines
    WHERE userid = $1
"#;

const LIST_PAST: &str = r#"
    SELECT id, userid, task, deadline, completed
    FROM deadlines
    WHERE userid = $1 AND (deadline < $2 OR completed)
    ORDER BY deadline DESC
"#;

const LIST_CURRENT: &str = r#"
    SELECT id, userid, task, deadline, completed
    FROM deadlines
    WHERE userid = $1 AND deadline >= $2 AND NOT completed
    ORDER BY deadline ASC
"#;

const INSERT: &str = r#"
    INSERT INTO deadlines (userid, task, deadline, completed)
    VALUES ($1, $2, $3, FALSE)
"#;

const DELETE: &str = "DELETE FROM deadlines WHERE id = $1";
const UPDATE_TASK: &str = "UPDATE deadlines SET task = $1 WHERE id = $2";
const UPDATE_DATE: &str = "UPDATE deadlines SET deadline = $1 WHERE id = $2";
const SET_COMPLETED: &str = "UPDATE deadlines SET completed = $1 WHERE id = $2";

/// Deadline store backed by the `deadlines` table.
#[derive(Debug, Clone)]
pub struct PgDeadlineStore {
    config: StoreConfig,
}

impl PgDeadlineStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<PgConnection, StoreError> {
        connect(&self.config).await.map_err(StoreError::Connect)
    }

    async fn list(
        &self,
        sql: &'static str,
        user_id: &str,
        today: Option<NaiveDate>,
    ) -> Result<Vec<Deadline>, StoreError> {
        let mut conn = self.connect().await?;

        let mut query = sqlx::query_as::<_, Deadline>(sql).bind(user_id);
        if let Some(today) = today {
            query = query.bind(today);
        }
        let result = query.fetch_all(&mut conn).await;

        release(conn).await;
        Ok(result?)
    }
}

#[async_trait]
impl DeadlineStore for PgDeadlineStore {
    async fn list_all(&self, user_id: &str) -> Result<Vec<Deadline>, StoreError> {
        self.list(LIST_ALL, user_id, None).await
    }

    async fn list_past(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Deadline>, StoreError> {
        self.list(LIST_PAST, user_id, Some(today)).await
    }

    async fn list_current(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Deadline>, StoreError> {
        self.list(LIST_CURRENT, user_id, Some(today)).await
    }

    async fn add(&self, deadline: &NewDeadline) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;

        let result = sqlx::query(INSERT)
            .bind(&deadline.user_id)
            .bind(&deadline.task)
            .bind(deadline.deadline_date)
            .execute(&mut conn)
            .await;

        release(conn).await;
        result?;
        Ok(())
    }

    async fn delete(&self, id: DeadlineId) -> Result<u64, StoreError> {
        let mut conn = self.connect().await?;

        let result = sqlx::query(DELETE).bind(id.get()).execute(&mut conn).await;

        release(conn).await;
        Ok(result?.rows_affected())
    }

    async fn update(&self, id: DeadlineId, changes: &DeadlineUpdate) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;

        let result = apply_update(&mut conn, id, changes).await;

        release(conn).await;
        Ok(result?)
    }

    async fn set_completed(&self, id: DeadlineId, completed: bool) -> Result<u64, StoreError> {
        let mut conn = self.connect().await?;

        let result = sqlx::query(SET_COMPLETED)
            .bind(completed)
            .bind(id.get())
            .execute(&mut conn)
            .await;

        release(conn).await;
        Ok(result?.rows_affected())
    }
}

/// Both field updates commit together or not at all.
async fn apply_update(
    conn: &mut PgConnection,
    id: DeadlineId,
    changes: &DeadlineUpdate,
) -> Result<(), sqlx::Error> {
    let mut tx = conn.begin().await?;

    if let Some(task) = &changes.task {
        sqlx::query(UPDATE_TASK)
            .bind(task)
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
    }

    if let Some(date) = changes.deadline_date {
        sqlx::query(UPDATE_DATE)
            .bind(date)
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await
}
