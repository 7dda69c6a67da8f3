//! Classification of repository failures into domain errors.
//!
//! Constraint failures that surface at commit keep their meaning
//! (duplicate email, missing owner). Connection and query failures become
//! internal errors whose message is logged and then redacted at the edge.

use serde_json::json;

use super::Error;
use super::ports::{StoreHealthError, TaskPersistenceError, UserPersistenceError};

impl From<UserPersistenceError> for Error {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::DuplicateEmail { email } => {
                Self::duplicate_key(format!("email {email} is already registered"))
                    .with_details(json!({ "field": "email", "value": email }))
            }
            other @ (UserPersistenceError::Connection { .. }
            | UserPersistenceError::Query { .. }) => Self::internal(other.to_string()),
        }
    }
}

impl From<TaskPersistenceError> for Error {
    fn from(value: TaskPersistenceError) -> Self {
        match value {
            TaskPersistenceError::OwnerMissing { user_id } => owner_missing(user_id),
            other @ (TaskPersistenceError::Connection { .. }
            | TaskPersistenceError::Query { .. }) => Self::internal(other.to_string()),
        }
    }
}

impl From<StoreHealthError> for Error {
    fn from(value: StoreHealthError) -> Self {
        Self::internal(value.to_string())
    }
}

/// Reference error for a task owner that does not exist.
#[must_use]
pub fn owner_missing(user_id: i64) -> Error {
    Error::reference_not_found(format!("user {user_id} does not exist"))
        .with_details(json!({ "field": "userId", "value": user_id }))
}
