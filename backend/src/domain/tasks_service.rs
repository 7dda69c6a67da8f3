//! Task use cases: reads and the checked mutation pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::mutation::{
    Resource, ensure_expected_revision, ensure_identifiers_match, not_found,
    resolve_stale_commit,
};
use super::ports::{TaskRepository, TasksCommand, TasksQuery, UpdateOutcome, UserRepository};
use super::validation::{required, validate_payload};
use super::{
    CreateTaskPayload, Error, IntegrityChecker, Task, TaskId, UpdateTaskPayload, UserId,
};

/// Tasks service backed by a [`TaskRepository`], checking owners through a
/// [`UserRepository`].
pub struct TasksService<T: ?Sized, U: ?Sized> {
    tasks: Arc<T>,
    users: Arc<U>,
    integrity: IntegrityChecker<U>,
    clock: Arc<dyn Clock>,
}

impl<T, U> TasksService<T, U>
where
    T: TaskRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Build the service.
    pub fn new(tasks: Arc<T>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks,
            integrity: IntegrityChecker::new(Arc::clone(&users)),
            users,
            clock,
        }
    }

    async fn load(&self, id: TaskId) -> Result<Option<Task>, Error> {
        Ok(self.tasks.find_by_id(id).await?)
    }

    async fn load_existing(&self, id: TaskId) -> Result<Task, Error> {
        self.load(id)
            .await?
            .ok_or_else(|| not_found(Resource::Task, id.get()))
    }
}

#[async_trait]
impl<T, U> TasksCommand for TasksService<T, U>
where
    T: TaskRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn create_task(&self, payload: CreateTaskPayload) -> Result<Task, Error> {
        let payload = payload.normalised();
        validate_payload(&payload)?;
        let details = payload.into_details()?;

        self.integrity.ensure_owner_exists(details.user_id).await?;

        let task = self.tasks.insert(&details, self.clock.utc()).await?;
        info!(task_id = %task.id, user_id = %task.details.user_id, "task created");
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, payload: UpdateTaskPayload) -> Result<Task, Error> {
        let payload = payload.normalised();
        validate_payload(&payload)?;
        let payload_id = required(payload.id, "id")?;
        ensure_identifiers_match(Resource::Task, id.get(), payload_id)?;
        let expected_revision = payload.expected_revision;
        let details = payload.into_details()?;

        self.integrity.ensure_owner_exists(details.user_id).await?;

        let current = self.load_existing(id).await?;
        ensure_expected_revision(Resource::Task, id.get(), expected_revision, current.revision)?;
        let next = current.revised(details, self.clock.utc());

        match self.tasks.update(&next, current.revision).await? {
            UpdateOutcome::Applied => {
                info!(task_id = %id, revision = next.revision, "task updated");
                Ok(next)
            }
            UpdateOutcome::Stale => {
                let error =
                    resolve_stale_commit(Resource::Task, id.get(), current.revision, self.load(id))
                        .await;
                warn!(task_id = %id, code = ?error.code(), "task update lost a race");
                Err(error)
            }
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), Error> {
        self.load_existing(id).await?;
        if !self.tasks.delete(id).await? {
            return Err(not_found(Resource::Task, id.get()));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

#[async_trait]
impl<T, U> TasksQuery for TasksService<T, U>
where
    T: TaskRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn list_tasks(&self) -> Result<Vec<Task>, Error> {
        Ok(self.tasks.list().await?)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, Error> {
        self.load_existing(id).await
    }

    async fn list_tasks_for_user(&self, owner: UserId) -> Result<Vec<Task>, Error> {
        if self.users.find_by_id(owner).await?.is_none() {
            return Err(not_found(Resource::User, owner.get()));
        }
        Ok(self.tasks.list_by_owner(owner).await?)
    }
}

#[cfg(test)]
#[path = "tasks_service_tests.rs"]
mod tests;
