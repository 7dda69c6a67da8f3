//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{CreateUserPayload, Error, UpdateUserPayload, User, UserId};

/// User create, update and delete use cases.
///
/// Implementations run the full mutation pipeline: field validation,
/// identifier matching, integrity checks, then the guarded write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a user from a raw payload.
    async fn create_user(&self, payload: CreateUserPayload) -> Result<User, Error>;

    /// Replace the client-settable fields of user `id`.
    async fn update_user(&self, id: UserId, payload: UpdateUserPayload) -> Result<User, Error>;

    /// Delete user `id` together with the tasks it owns.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
