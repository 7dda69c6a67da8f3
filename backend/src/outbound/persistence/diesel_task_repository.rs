//! PostgreSQL-backed `TaskRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TaskPersistenceError, TaskRepository, UpdateOutcome};
use crate::domain::{Task, TaskDetails, TaskId, TaskStatus, UserId};

use super::diesel_helpers::{
    DieselFailure, cast_revision, cast_revision_for_db, classify_diesel_error, collect_rows,
    map_pool_error_message,
};
use super::models::{NewTaskRow, TaskChangeset, TaskRow};
use super::pool::{DbPool, PoolError};
use super::schema::tasks;

/// Diesel-backed implementation of the [`TaskRepository`] port.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskPersistenceError {
    TaskPersistenceError::connection(map_pool_error_message(error))
}

/// Map a Diesel failure, attributing owner key violations to `owner`.
fn map_write_error(error: diesel::result::Error, owner: UserId) -> TaskPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::ForeignKeyViolation { .. } => {
            TaskPersistenceError::owner_missing(owner.get())
        }
        other => map_failure(other),
    }
}

fn map_read_error(error: diesel::result::Error) -> TaskPersistenceError {
    map_failure(classify_diesel_error(error))
}

fn map_failure(failure: DieselFailure) -> TaskPersistenceError {
    match failure {
        DieselFailure::Connection(message) => TaskPersistenceError::connection(message),
        DieselFailure::Query(message) => TaskPersistenceError::query(message),
        DieselFailure::UniqueViolation { constraint }
        | DieselFailure::ForeignKeyViolation { constraint } => TaskPersistenceError::query(
            format!(
                "constraint {} violated",
                constraint.as_deref().unwrap_or("unknown")
            ),
        ),
    }
}

fn row_to_task(row: TaskRow) -> Result<Task, String> {
    let status: TaskStatus = row
        .status
        .parse()
        .map_err(|error| format!("task {}: {error}", row.id))?;
    Ok(Task {
        id: TaskId::new(row.id),
        details: TaskDetails {
            title: row.title,
            description: row.description,
            status,
            user_id: UserId::new(row.user_id),
            started_at: row.started_at,
            finished_at: row.finished_at,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
        revision: cast_revision(row.revision),
    })
}

fn rows_to_tasks(rows: Vec<TaskRow>) -> Result<Vec<Task>, TaskPersistenceError> {
    collect_rows(rows.into_iter().map(row_to_task), TaskPersistenceError::query)
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TaskRow> = tasks::table
            .select(TaskRow::as_select())
            .order_by(tasks::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_tasks(rows)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TaskRow> = tasks::table
            .filter(tasks::user_id.eq(owner.get()))
            .select(TaskRow::as_select())
            .order_by(tasks::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_tasks(rows)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TaskRow> = tasks::table
            .filter(tasks::id.eq(id.get()))
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_task)
            .transpose()
            .map_err(TaskPersistenceError::query)
    }

    async fn insert(
        &self,
        details: &TaskDetails,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewTaskRow {
            title: &details.title,
            description: details.description.as_deref(),
            status: details.status.as_str(),
            user_id: details.user_id.get(),
            started_at: details.started_at,
            finished_at: details.finished_at,
            revision: 1,
            created_at: now,
            updated_at: now,
        };
        let row: TaskRow = diesel::insert_into(tasks::table)
            .values(&new_row)
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_write_error(error, details.user_id))?;
        row_to_task(row).map_err(TaskPersistenceError::query)
    }

    async fn update(
        &self,
        task: &Task,
        expected_revision: u32,
    ) -> Result<UpdateOutcome, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = TaskChangeset {
            title: &task.details.title,
            description: task.details.description.as_deref(),
            status: task.details.status.as_str(),
            user_id: task.details.user_id.get(),
            started_at: task.details.started_at,
            finished_at: task.details.finished_at,
            revision: cast_revision_for_db(task.revision),
            updated_at: task.updated_at,
        };
        let updated_rows = diesel::update(tasks::table)
            .filter(
                tasks::id
                    .eq(task.id.get())
                    .and(tasks::revision.eq(cast_revision_for_db(expected_revision))),
            )
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(|error| map_write_error(error, task.details.user_id))?;
        Ok(UpdateOutcome::from_affected_rows(updated_rows))
    }

    async fn delete(&self, id: TaskId) -> Result<bool, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(deleted > 0)
    }
}
