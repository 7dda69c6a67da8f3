//! Request payloads accepted by the user and task mutations.
//!
//! Payloads carry only client-settable fields. Every field is optional at the
//! serde level so that a missing value is reported by the rule set alongside
//! every other violation instead of aborting deserialisation. Unknown fields,
//! including server-assigned ones such as `createdAt` or `revision`, are
//! rejected.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{CrossFieldRules, required, trim_text};
use super::{
    EmailAddress, Error, FieldErrors, TaskDetails, TaskStatus, UnknownTaskStatus, UserId,
    UserProfile,
};

static TASK_STATUS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(not_started|in_progress|done)$")
        .unwrap_or_else(|error| panic!("task status regex failed to compile: {error}"))
});

/// Body of `POST /users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserPayload {
    /// Display name, 3 to 100 characters.
    #[validate(
        required(message = "name is required"),
        length(min = 3, max = 100, message = "name must be between 3 and 100 characters")
    )]
    #[schema(example = "Ana Silva")]
    pub name: Option<String>,
    /// Email address, unique regardless of case.
    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid email address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    #[schema(example = "ana@example.com")]
    pub email: Option<String>,
    /// Optional date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Optional occupation, at most 100 characters.
    #[validate(length(max = 100, message = "occupation must be at most 100 characters"))]
    pub occupation: Option<String>,
}

impl CreateUserPayload {
    /// Trim text fields; blank optional text becomes absent.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            name: trim_text(self.name),
            email: trim_text(self.email),
            birth_date: self.birth_date,
            occupation: trim_text(self.occupation),
        }
    }

    /// Convert a validated payload into a [`UserProfile`].
    ///
    /// # Errors
    /// Returns a validation failure if a required field is absent.
    pub fn into_profile(self) -> Result<UserProfile, Error> {
        let email = required(self.email, "email")?;
        Ok(UserProfile {
            name: required(self.name, "name")?,
            email: EmailAddress::normalised(&email),
            birth_date: self.birth_date,
            occupation: self.occupation,
        })
    }
}

impl CrossFieldRules for CreateUserPayload {}

/// Body of `PUT /users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserPayload {
    /// Must equal the path identifier.
    #[validate(
        required(message = "id is required"),
        range(min = 1, message = "id must be a positive integer")
    )]
    #[schema(example = 1)]
    pub id: Option<i64>,
    /// Display name, 3 to 100 characters.
    #[validate(
        required(message = "name is required"),
        length(min = 3, max = 100, message = "name must be between 3 and 100 characters")
    )]
    pub name: Option<String>,
    /// Email address, unique regardless of case.
    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid email address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    pub email: Option<String>,
    /// Optional date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Optional occupation, at most 100 characters.
    #[validate(length(max = 100, message = "occupation must be at most 100 characters"))]
    pub occupation: Option<String>,
    /// Revision the client last saw; a mismatch is reported as a conflict.
    #[validate(range(min = 1, message = "expectedRevision must be a positive integer"))]
    pub expected_revision: Option<u32>,
}

impl UpdateUserPayload {
    /// Trim text fields; blank optional text becomes absent.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            id: self.id,
            name: trim_text(self.name),
            email: trim_text(self.email),
            birth_date: self.birth_date,
            occupation: trim_text(self.occupation),
            expected_revision: self.expected_revision,
        }
    }

    /// Convert a validated payload into a [`UserProfile`].
    ///
    /// # Errors
    /// Returns a validation failure if a required field is absent.
    pub fn into_profile(self) -> Result<UserProfile, Error> {
        CreateUserPayload {
            name: self.name,
            email: self.email,
            birth_date: self.birth_date,
            occupation: self.occupation,
        }
        .into_profile()
    }
}

impl CrossFieldRules for UpdateUserPayload {}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskPayload {
    /// Title, 3 to 100 characters.
    #[validate(
        required(message = "title is required"),
        length(min = 3, max = 100, message = "title must be between 3 and 100 characters")
    )]
    #[schema(example = "Write report")]
    pub title: Option<String>,
    /// Optional description, at most 500 characters.
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    /// One of `not_started`, `in_progress`, `done`.
    #[validate(
        required(message = "status is required"),
        regex(
            path = *TASK_STATUS_PATTERN,
            message = "status must be one of not_started, in_progress, done"
        )
    )]
    #[schema(example = "not_started")]
    pub status: Option<String>,
    /// Owner; must name an existing user.
    #[validate(
        required(message = "userId is required"),
        range(min = 1, message = "userId must be a positive integer")
    )]
    #[schema(example = 1)]
    pub user_id: Option<i64>,
    /// When work started.
    pub started_at: Option<DateTime<Utc>>,
    /// When work finished; not before `startedAt`.
    pub finished_at: Option<DateTime<Utc>>,
}

impl CreateTaskPayload {
    /// Trim text fields; blank optional text becomes absent.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            title: trim_text(self.title),
            description: trim_text(self.description),
            status: trim_text(self.status),
            ..self
        }
    }

    /// Convert a validated payload into [`TaskDetails`].
    ///
    /// # Errors
    /// Returns a validation failure if a required field is absent or the
    /// status is unknown.
    pub fn into_details(self) -> Result<TaskDetails, Error> {
        let status = required(self.status, "status")?;
        let status: TaskStatus = status
            .parse()
            .map_err(|error: UnknownTaskStatus| Error::invalid_field("status", error.to_string()))?;
        Ok(TaskDetails {
            title: required(self.title, "title")?,
            description: self.description,
            status,
            user_id: UserId::new(required(self.user_id, "userId")?),
            started_at: self.started_at,
            finished_at: self.finished_at,
        })
    }
}

impl CrossFieldRules for CreateTaskPayload {
    fn cross_field_errors(&self) -> FieldErrors {
        schedule_errors(self.started_at, self.finished_at)
    }
}

/// Body of `PUT /tasks/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskPayload {
    /// Must equal the path identifier.
    #[validate(
        required(message = "id is required"),
        range(min = 1, message = "id must be a positive integer")
    )]
    #[schema(example = 1)]
    pub id: Option<i64>,
    /// Title, 3 to 100 characters.
    #[validate(
        required(message = "title is required"),
        length(min = 3, max = 100, message = "title must be between 3 and 100 characters")
    )]
    pub title: Option<String>,
    /// Optional description, at most 500 characters.
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    /// One of `not_started`, `in_progress`, `done`.
    #[validate(
        required(message = "status is required"),
        regex(
            path = *TASK_STATUS_PATTERN,
            message = "status must be one of not_started, in_progress, done"
        )
    )]
    pub status: Option<String>,
    /// Owner; must name an existing user.
    #[validate(
        required(message = "userId is required"),
        range(min = 1, message = "userId must be a positive integer")
    )]
    pub user_id: Option<i64>,
    /// When work started.
    pub started_at: Option<DateTime<Utc>>,
    /// When work finished; not before `startedAt`.
    pub finished_at: Option<DateTime<Utc>>,
    /// Revision the client last saw; a mismatch is reported as a conflict.
    #[validate(range(min = 1, message = "expectedRevision must be a positive integer"))]
    pub expected_revision: Option<u32>,
}

impl UpdateTaskPayload {
    /// Trim text fields; blank optional text becomes absent.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            title: trim_text(self.title),
            description: trim_text(self.description),
            status: trim_text(self.status),
            ..self
        }
    }

    /// Convert a validated payload into [`TaskDetails`].
    ///
    /// # Errors
    /// Returns a validation failure if a required field is absent or the
    /// status is unknown.
    pub fn into_details(self) -> Result<TaskDetails, Error> {
        CreateTaskPayload {
            title: self.title,
            description: self.description,
            status: self.status,
            user_id: self.user_id,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
        .into_details()
    }
}

impl CrossFieldRules for UpdateTaskPayload {
    fn cross_field_errors(&self) -> FieldErrors {
        schedule_errors(self.started_at, self.finished_at)
    }
}

fn schedule_errors(
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let (Some(started), Some(finished)) = (started_at, finished_at) {
        if finished < started {
            errors.insert(
                "finishedAt".to_owned(),
                vec!["finishedAt must not precede startedAt".to_owned()],
            );
        }
    }
    errors
}
