//! User use cases: reads and the checked mutation pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::mutation::{
    Resource, ensure_expected_revision, ensure_identifiers_match, not_found,
    resolve_stale_commit,
};
use super::ports::{UpdateOutcome, UserRepository, UsersCommand, UsersQuery};
use super::validation::{required, validate_payload};
use super::{CreateUserPayload, Error, IntegrityChecker, UpdateUserPayload, User, UserId};

/// Users service backed by a [`UserRepository`].
pub struct UsersService<U: ?Sized> {
    users: Arc<U>,
    integrity: IntegrityChecker<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UsersService<U>
where
    U: UserRepository + ?Sized,
{
    /// Build the service over `users`, stamping mutations with `clock`.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            integrity: IntegrityChecker::new(Arc::clone(&users)),
            users,
            clock,
        }
    }

    async fn load(&self, id: UserId) -> Result<Option<User>, Error> {
        Ok(self.users.find_by_id(id).await?)
    }

    async fn load_existing(&self, id: UserId) -> Result<User, Error> {
        self.load(id)
            .await?
            .ok_or_else(|| not_found(Resource::User, id.get()))
    }
}

#[async_trait]
impl<U> UsersCommand for UsersService<U>
where
    U: UserRepository + ?Sized,
{
    async fn create_user(&self, payload: CreateUserPayload) -> Result<User, Error> {
        let payload = payload.normalised();
        validate_payload(&payload)?;
        let profile = payload.into_profile()?;

        self.integrity
            .ensure_email_available(&profile.email, None)
            .await?;

        let user = self.users.insert(&profile, self.clock.utc()).await?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, payload: UpdateUserPayload) -> Result<User, Error> {
        let payload = payload.normalised();
        validate_payload(&payload)?;
        let payload_id = required(payload.id, "id")?;
        ensure_identifiers_match(Resource::User, id.get(), payload_id)?;
        let expected_revision = payload.expected_revision;
        let profile = payload.into_profile()?;

        self.integrity
            .ensure_email_available(&profile.email, Some(id))
            .await?;

        let current = self.load_existing(id).await?;
        ensure_expected_revision(Resource::User, id.get(), expected_revision, current.revision)?;
        let next = current.revised(profile, self.clock.utc());

        match self.users.update(&next, current.revision).await? {
            UpdateOutcome::Applied => {
                info!(user_id = %id, revision = next.revision, "user updated");
                Ok(next)
            }
            UpdateOutcome::Stale => {
                let error =
                    resolve_stale_commit(Resource::User, id.get(), current.revision, self.load(id))
                        .await;
                warn!(user_id = %id, code = ?error.code(), "user update lost a race");
                Err(error)
            }
        }
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        self.load_existing(id).await?;
        if !self.users.delete(id).await? {
            return Err(not_found(Resource::User, id.get()));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<U> UsersQuery for UsersService<U>
where
    U: UserRepository + ?Sized,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.list().await?)
    }

    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.load_existing(id).await
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
