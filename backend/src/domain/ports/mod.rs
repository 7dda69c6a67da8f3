//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Repository ports are implemented by the outbound adapters (Diesel and the
//! in-memory store). Command and query ports are the use cases the HTTP
//! handlers drive.

mod macros;
pub(crate) use macros::define_port_error;

mod store_health;
mod task_repository;
mod tasks_command;
mod tasks_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use store_health::MockStoreHealth;
pub use store_health::{StoreHealth, StoreHealthError};
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskPersistenceError, TaskRepository};
#[cfg(test)]
pub use tasks_command::MockTasksCommand;
pub use tasks_command::TasksCommand;
#[cfg(test)]
pub use tasks_query::MockTasksQuery;
pub use tasks_query::TasksQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

/// Result of a revision-guarded update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The guarded row was rewritten.
    Applied,
    /// No row matched both the identifier and the expected revision.
    ///
    /// The row is either gone or was changed by another writer; callers
    /// re-read it to tell the two apart.
    Stale,
}

impl UpdateOutcome {
    /// Classify the affected-row count of a guarded update.
    #[must_use]
    pub const fn from_affected_rows(rows: usize) -> Self {
        if rows == 0 { Self::Stale } else { Self::Applied }
    }
}
