//! Referential integrity checks run before the mutation executor.
//!
//! The checks are read-only lookups. They give callers a structured 400
//! instead of a raw constraint failure; the store constraints remain as the
//! backstop for writes racing past a check.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::ports::UserRepository;
use super::{EmailAddress, Error, UserId, owner_missing};

/// Verifies task owners and user email uniqueness.
pub struct IntegrityChecker<U: ?Sized> {
    users: Arc<U>,
}

impl<U: ?Sized> Clone for IntegrityChecker<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U> IntegrityChecker<U>
where
    U: UserRepository + ?Sized,
{
    /// Build a checker reading through `users`.
    pub const fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Require that `owner` names an existing user.
    ///
    /// # Errors
    /// Returns [`super::ErrorCode::ReferenceNotFound`] naming the id when the
    /// user does not exist.
    pub async fn ensure_owner_exists(&self, owner: UserId) -> Result<(), Error> {
        if self.users.find_by_id(owner).await?.is_some() {
            return Ok(());
        }
        debug!(user_id = %owner, "task owner does not exist");
        Err(owner_missing(owner.get()))
    }

    /// Require that no user other than `updating` holds `email`.
    ///
    /// Pass `None` for creates. `email` is already canonical, so the
    /// comparison is case-insensitive.
    ///
    /// # Errors
    /// Returns [`super::ErrorCode::DuplicateKey`] when another user holds it.
    pub async fn ensure_email_available(
        &self,
        email: &EmailAddress,
        updating: Option<UserId>,
    ) -> Result<(), Error> {
        match self.users.find_by_email(email).await? {
            Some(holder) if Some(holder.id) != updating => {
                debug!(%email, holder = %holder.id, "email already registered");
                Err(
                    Error::duplicate_key(format!("email {email} is already registered"))
                        .with_details(json!({ "field": "email", "value": email.as_str() })),
                )
            }
            _ => Ok(()),
        }
    }
}
