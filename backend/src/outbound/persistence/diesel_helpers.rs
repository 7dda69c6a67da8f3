//! Shared helpers for the Diesel repositories.
//!
//! Diesel errors are classified once here; each repository then maps the
//! classification onto its own port error.

use tracing::debug;

use super::pool::PoolError;

/// Store failure reduced to the cases the repositories distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be used.
    Connection(String),
    /// A unique index rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Anything else.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging its detail at debug level.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> DieselFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(ToOwned::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(ToOwned::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query("database query error".to_owned())
        }
        _ => DieselFailure::Query("database error".to_owned()),
    }
}

/// Cast database revision (i32) to domain revision (u32).
///
/// A CHECK constraint keeps stored revisions at 1 or above.
#[expect(
    clippy::cast_sign_loss,
    reason = "revision is always positive in the database"
)]
pub(crate) const fn cast_revision(revision: i32) -> u32 {
    revision as u32
}

/// Cast domain revision (u32) to database revision (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "revision values are small positive integers"
)]
pub(crate) const fn cast_revision_for_db(revision: u32) -> i32 {
    revision as i32
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct ConstraintInfo(&'static str);

    impl DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "constraint violated"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(ConstraintInfo(constraint)))
    }

    #[rstest]
    fn unique_violation_keeps_constraint() {
        let failure = classify_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            "users_email_lower_key",
        ));
        assert_eq!(
            failure,
            DieselFailure::UniqueViolation {
                constraint: Some("users_email_lower_key".to_owned())
            }
        );
    }

    #[rstest]
    fn foreign_key_violation_keeps_constraint() {
        let failure = classify_diesel_error(database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "tasks_user_id_fkey",
        ));
        assert!(matches!(failure, DieselFailure::ForeignKeyViolation { .. }));
    }

    #[rstest]
    fn closed_connection_is_connection_failure() {
        let failure =
            classify_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, "n/a"));
        assert!(matches!(failure, DieselFailure::Connection(_)));
    }

    #[rstest]
    fn not_found_is_query_failure() {
        assert!(matches!(
            classify_diesel_error(DieselError::NotFound),
            DieselFailure::Query(_)
        ));
    }

    #[rstest]
    #[case(1)]
    #[case(42)]
    fn revisions_cast_both_ways(#[case] revision: u32) {
        assert_eq!(cast_revision(cast_revision_for_db(revision)), revision);
    }

    #[rstest]
    fn collect_rows_reports_first_error() {
        let rows = vec![Ok(1), Err("bad row".to_owned()), Err("later".to_owned())];
        let result: Result<Vec<i32>, String> = collect_rows(rows.into_iter(), |e| e);
        assert_eq!(result, Err("bad row".to_owned()));
    }
}
