//! In-process store implementing the repository ports.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. It mirrors the PostgreSQL constraints the service relies on:
//! canonical emails are unique, a task's owner must exist, deleting a user
//! cascades to its tasks, and updates are guarded by the stored revision.
//! Each operation holds the lock for its whole read-check-write, so every
//! write is atomic.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{
    StoreHealth, StoreHealthError, TaskPersistenceError, TaskRepository, UpdateOutcome,
    UserPersistenceError, UserRepository,
};
use crate::domain::{EmailAddress, Task, TaskDetails, TaskId, User, UserId, UserProfile};

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    tasks: BTreeMap<TaskId, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

impl StoreState {
    fn email_taken(&self, email: &EmailAddress, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| &user.profile.email == email && Some(user.id) != except)
    }

    /// Whether `key` exists at `expected_revision`; a guarded update touches
    /// nothing otherwise, so no constraint can fire.
    fn guard_holds<K: Ord, V>(
        rows: &BTreeMap<K, V>,
        key: &K,
        expected_revision: u32,
        revision: impl Fn(&V) -> u32,
    ) -> bool {
        rows.get(key)
            .is_some_and(|row| revision(row) == expected_revision)
    }
}

/// Thread-safe in-memory users and tasks store.
///
/// Clones share the same underlying state.
///
/// # Examples
/// ```
/// use taskboard::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// let shared = store.clone();
/// # drop(shared);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| &user.profile.email == email)
            .cloned())
    }

    async fn insert(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut state = self.state.write().await;
        if state.email_taken(&profile.email, None) {
            return Err(UserPersistenceError::duplicate_email(profile.email.as_str()));
        }
        state.last_user_id += 1;
        let user = User {
            id: UserId::new(state.last_user_id),
            profile: profile.clone(),
            created_at: now,
            updated_at: now,
            revision: 1,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        user: &User,
        expected_revision: u32,
    ) -> Result<UpdateOutcome, UserPersistenceError> {
        let mut state = self.state.write().await;
        if !StoreState::guard_holds(&state.users, &user.id, expected_revision, |row| {
            row.revision
        }) {
            debug!(user_id = %user.id, expected_revision, "guarded user update matched no row");
            return Ok(UpdateOutcome::Stale);
        }
        if state.email_taken(&user.profile.email, Some(user.id)) {
            return Err(UserPersistenceError::duplicate_email(user.profile.email.as_str()));
        }
        state.users.insert(user.id, user.clone());
        Ok(UpdateOutcome::Applied)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.tasks.retain(|_, task| task.details.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Task>, TaskPersistenceError> {
        Ok(self.state.read().await.tasks.values().cloned().collect())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, TaskPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.details.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskPersistenceError> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn insert(
        &self,
        details: &TaskDetails,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskPersistenceError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&details.user_id) {
            return Err(TaskPersistenceError::owner_missing(details.user_id.get()));
        }
        state.last_task_id += 1;
        let task = Task {
            id: TaskId::new(state.last_task_id),
            details: details.clone(),
            created_at: now,
            updated_at: now,
            revision: 1,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        task: &Task,
        expected_revision: u32,
    ) -> Result<UpdateOutcome, TaskPersistenceError> {
        let mut state = self.state.write().await;
        if !StoreState::guard_holds(&state.tasks, &task.id, expected_revision, |row| {
            row.revision
        }) {
            debug!(task_id = %task.id, expected_revision, "guarded task update matched no row");
            return Ok(UpdateOutcome::Stale);
        }
        if !state.users.contains_key(&task.details.user_id) {
            return Err(TaskPersistenceError::owner_missing(task.details.user_id.get()));
        }
        state.tasks.insert(task.id, task.clone());
        Ok(UpdateOutcome::Applied)
    }

    async fn delete(&self, id: TaskId) -> Result<bool, TaskPersistenceError> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreHealthError> {
        drop(self.state.read().await);
        Ok(())
    }
}
