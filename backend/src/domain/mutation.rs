//! Shared steps of the mutation executor.
//!
//! Services call these around their repository writes: identifier matching
//! before any store access, the optional client revision check, and the
//! re-read that classifies a guarded update which touched no rows.

use std::fmt;
use std::future::Future;

use serde_json::json;
use tracing::debug;

use super::{Error, Task, User};

/// Kind of resource a mutation targets, used in messages and details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A user.
    User,
    /// A task.
    Task,
}

impl Resource {
    /// Lowercase name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities carrying an optimistic concurrency revision.
pub trait Versioned {
    /// Current revision.
    fn revision(&self) -> u32;
}

impl Versioned for User {
    fn revision(&self) -> u32 {
        self.revision
    }
}

impl Versioned for Task {
    fn revision(&self) -> u32 {
        self.revision
    }
}

/// Not found error naming the resource and identifier.
#[must_use]
pub fn not_found(resource: Resource, id: i64) -> Error {
    Error::not_found(format!("{resource} {id} not found"))
        .with_details(json!({ "resource": resource.as_str(), "id": id }))
}

/// Conflict error telling the caller to reload before retrying.
#[must_use]
pub fn conflict(resource: Resource, id: i64, expected: u32, actual: u32) -> Error {
    Error::conflict(format!(
        "{resource} {id} was modified by another request; reload it and retry"
    ))
    .with_details(json!({
        "resource": resource.as_str(),
        "id": id,
        "expectedRevision": expected,
        "actualRevision": actual,
    }))
}

/// Reject an update whose payload identifier differs from the path.
///
/// # Errors
/// Returns [`super::ErrorCode::IdentifierMismatch`] when the two differ.
pub fn ensure_identifiers_match(
    resource: Resource,
    path_id: i64,
    payload_id: i64,
) -> Result<(), Error> {
    if path_id == payload_id {
        return Ok(());
    }
    debug!(%resource, path_id, payload_id, "identifier mismatch");
    Err(Error::identifier_mismatch(format!(
        "path {resource} id {path_id} does not match payload id {payload_id}"
    ))
    .with_details(json!({ "pathId": path_id, "payloadId": payload_id })))
}

/// Compare the revision a client last saw with the loaded one.
///
/// # Errors
/// Returns a conflict when `expected` is present and differs from `actual`.
pub fn ensure_expected_revision(
    resource: Resource,
    id: i64,
    expected: Option<u32>,
    actual: u32,
) -> Result<(), Error> {
    match expected {
        Some(expected) if expected != actual => Err(conflict(resource, id, expected, actual)),
        _ => Ok(()),
    }
}

/// Classify a guarded update that affected no rows.
///
/// `reload` re-reads the row: gone means not found, present means another
/// writer moved it past `expected`. Read failures are returned as-is.
pub async fn resolve_stale_commit<T, Fut>(
    resource: Resource,
    id: i64,
    expected: u32,
    reload: Fut,
) -> Error
where
    T: Versioned,
    Fut: Future<Output = Result<Option<T>, Error>>,
{
    match reload.await {
        Ok(Some(current)) => {
            let actual = current.revision();
            debug!(%resource, id, expected, actual, "stale revision at commit");
            conflict(resource, id, expected, actual)
        }
        Ok(None) => {
            debug!(%resource, id, "row vanished before commit");
            not_found(resource, id)
        }
        Err(error) => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    struct Revisioned(u32);

    impl Versioned for Revisioned {
        fn revision(&self) -> u32 {
            self.0
        }
    }

    #[rstest]
    fn matching_identifiers_pass() {
        assert!(ensure_identifiers_match(Resource::Task, 4, 4).is_ok());
    }

    #[rstest]
    fn mismatched_identifiers_fail() {
        let error = ensure_identifiers_match(Resource::Task, 4, 5).expect_err("mismatch");
        assert_eq!(error.code(), ErrorCode::IdentifierMismatch);
        assert_eq!(
            error.message(),
            "path task id 4 does not match payload id 5"
        );
    }

    #[rstest]
    #[case(None, 3, true)]
    #[case(Some(3), 3, true)]
    #[case(Some(2), 3, false)]
    fn expected_revision_is_optional(
        #[case] expected: Option<u32>,
        #[case] actual: u32,
        #[case] accepted: bool,
    ) {
        let result = ensure_expected_revision(Resource::User, 1, expected, actual);
        assert_eq!(result.is_ok(), accepted);
    }

    #[tokio::test]
    async fn stale_commit_with_row_present_is_conflict() {
        let error = resolve_stale_commit(Resource::Task, 9, 1, async {
            Ok(Some(Revisioned(2)))
        })
        .await;
        assert_eq!(error.code(), ErrorCode::Conflict);
        let details = error.details().expect("conflict details");
        assert_eq!(details["expectedRevision"], 1);
        assert_eq!(details["actualRevision"], 2);
    }

    #[tokio::test]
    async fn stale_commit_with_row_gone_is_not_found() {
        let error = resolve_stale_commit(Resource::User, 9, 1, async {
            Ok::<Option<Revisioned>, Error>(None)
        })
        .await;
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "user 9 not found");
    }

    #[tokio::test]
    async fn stale_commit_reload_failure_propagates() {
        let error = resolve_stale_commit(Resource::Task, 9, 1, async {
            Err::<Option<Revisioned>, Error>(Error::internal("store down"))
        })
        .await;
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
