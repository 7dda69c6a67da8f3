//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, User, UserId, UserProfile};

use super::{UpdateOutcome, define_port_error};

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The store's case-insensitive email index rejected the write.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

/// Storage for users.
///
/// Emails are stored in their canonical form, so lookups by email compare
/// canonical values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by identifier.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the user holding `email`, if any.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Persist a new user with revision 1 and both timestamps set to `now`.
    async fn insert(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError>;

    /// Overwrite the row for `user.id` only if it is still at
    /// `expected_revision`. The caller sets the new revision and timestamp.
    async fn update(
        &self,
        user: &User,
        expected_revision: u32,
    ) -> Result<UpdateOutcome, UserPersistenceError>;

    /// Remove a user and the tasks it owns. Returns whether a row was removed.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
