//! Driving port for task reads.

use async_trait::async_trait;

use crate::domain::{Error, Task, TaskId, UserId};

/// Task read use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TasksQuery: Send + Sync {
    /// Every task, ordered by identifier.
    async fn list_tasks(&self) -> Result<Vec<Task>, Error>;

    /// A single task; not found when absent.
    async fn get_task(&self, id: TaskId) -> Result<Task, Error>;

    /// Tasks owned by `owner`; not found when the user does not exist.
    async fn list_tasks_for_user(&self, owner: UserId) -> Result<Vec<Task>, Error>;
}
