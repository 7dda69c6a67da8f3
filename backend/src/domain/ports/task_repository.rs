//! Port abstraction for task persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Task, TaskDetails, TaskId, UserId};

use super::{UpdateOutcome, define_port_error};

define_port_error! {
    /// Persistence errors raised by task repository adapters.
    pub enum TaskPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
        /// The owner foreign key rejected the write.
        OwnerMissing { user_id: i64 } => "user {user_id} does not exist",
    }
}

/// Storage for tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks ordered by identifier.
    async fn list(&self) -> Result<Vec<Task>, TaskPersistenceError>;

    /// Tasks owned by `owner`, ordered by identifier.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskPersistenceError>;

    /// Fetch a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskPersistenceError>;

    /// Persist a new task with revision 1 and both timestamps set to `now`.
    async fn insert(
        &self,
        details: &TaskDetails,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskPersistenceError>;

    /// Overwrite the row for `task.id` only if it is still at
    /// `expected_revision`.
    async fn update(
        &self,
        task: &Task,
        expected_revision: u32,
    ) -> Result<UpdateOutcome, TaskPersistenceError>;

    /// Remove a task. Returns whether a row was removed.
    async fn delete(&self, id: TaskId) -> Result<bool, TaskPersistenceError>;
}
