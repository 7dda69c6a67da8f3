//! Driving port for task mutations.

use async_trait::async_trait;

use crate::domain::{CreateTaskPayload, Error, Task, TaskId, UpdateTaskPayload};

/// Task create, update and delete use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TasksCommand: Send + Sync {
    /// Create a task from a raw payload.
    async fn create_task(&self, payload: CreateTaskPayload) -> Result<Task, Error>;

    /// Replace the client-settable fields of task `id`.
    async fn update_task(&self, id: TaskId, payload: UpdateTaskPayload) -> Result<Task, Error>;

    /// Delete task `id`.
    async fn delete_task(&self, id: TaskId) -> Result<(), Error>;
}
