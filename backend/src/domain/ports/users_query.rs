//! Driving port for user reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// User read use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user, ordered by identifier.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// A single user; [`crate::domain::ErrorCode::NotFound`] when absent.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;
}
