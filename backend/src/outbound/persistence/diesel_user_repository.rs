//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UpdateOutcome, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId, UserProfile};

use super::diesel_helpers::{
    DieselFailure, cast_revision, cast_revision_for_db, classify_diesel_error,
    map_pool_error_message,
};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
///
/// Deleting a user relies on the `ON DELETE CASCADE` owner key to remove its
/// tasks in the same statement.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(map_pool_error_message(error))
}

/// Map a Diesel failure, attributing unique violations to `email`.
fn map_write_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { .. } => UserPersistenceError::duplicate_email(email),
        other => map_failure(other),
    }
}

fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    map_failure(classify_diesel_error(error))
}

fn map_failure(failure: DieselFailure) -> UserPersistenceError {
    match failure {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation { constraint }
        | DieselFailure::ForeignKeyViolation { constraint } => UserPersistenceError::query(
            format!(
                "constraint {} violated",
                constraint.as_deref().unwrap_or("unknown")
            ),
        ),
    }
}

fn row_to_user(row: UserRow) -> User {
    User {
        id: UserId::new(row.id),
        profile: UserProfile {
            name: row.name,
            email: EmailAddress::normalised(&row.email),
            birth_date: row.birth_date,
            occupation: row.occupation,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
        revision: cast_revision(row.revision),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(row_to_user))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(row_to_user))
    }

    async fn insert(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            name: &profile.name,
            email: profile.email.as_str(),
            birth_date: profile.birth_date,
            occupation: profile.occupation.as_deref(),
            revision: 1,
            created_at: now,
            updated_at: now,
        };
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_write_error(error, profile.email.as_str()))?;
        Ok(row_to_user(row))
    }

    async fn update(
        &self,
        user: &User,
        expected_revision: u32,
    ) -> Result<UpdateOutcome, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = UserChangeset {
            name: &user.profile.name,
            email: user.profile.email.as_str(),
            birth_date: user.profile.birth_date,
            occupation: user.profile.occupation.as_deref(),
            revision: cast_revision_for_db(user.revision),
            updated_at: user.updated_at,
        };
        let updated_rows = diesel::update(users::table)
            .filter(
                users::id
                    .eq(user.id.get())
                    .and(users::revision.eq(cast_revision_for_db(expected_revision))),
            )
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(|error| map_write_error(error, user.profile.email.as_str()))?;
        Ok(UpdateOutcome::from_affected_rows(updated_rows))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.filter(users::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn row_conversion_keeps_fields() {
        let at = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .expect("instant");
        let user = row_to_user(UserRow {
            id: 7,
            name: "Ana Silva".to_owned(),
            email: "ana@example.com".to_owned(),
            birth_date: None,
            occupation: Some("Engineer".to_owned()),
            revision: 3,
            created_at: at,
            updated_at: at,
        });
        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.revision, 3);
        assert_eq!(user.profile.occupation.as_deref(), Some("Engineer"));
    }

    #[rstest]
    fn non_constraint_write_failure_is_query_error() {
        let error = map_write_error(diesel::result::Error::NotFound, "ana@example.com");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn unattributed_constraint_failure_names_constraint() {
        let error = map_failure(DieselFailure::UniqueViolation {
            constraint: Some("users_pkey".to_owned()),
        });
        assert_eq!(
            error,
            UserPersistenceError::query("constraint users_pkey violated")
        );
    }

    #[rstest]
    fn connection_failure_maps_to_connection() {
        let error = map_failure(DieselFailure::Connection("closed".to_owned()));
        assert_eq!(error, UserPersistenceError::connection("closed"));
    }
}
