//! Task data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::UserId;

/// Store-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(i64);

impl TaskId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Progress state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Not picked up yet.
    NotStarted,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Wire and storage spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a [`TaskStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct UnknownTaskStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownTaskStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(UnknownTaskStatus(other.to_owned())),
        }
    }
}

/// Client-settable task fields, already validated and normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// Title, trimmed.
    pub title: String,
    /// Optional description; blank values are absent.
    pub description: Option<String>,
    /// Progress state.
    pub status: TaskStatus,
    /// Owning user.
    pub user_id: UserId,
    /// When work started, if known.
    pub started_at: Option<DateTime<Utc>>,
    /// When work finished, if known.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Client-settable fields.
    pub details: TaskDetails,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant of the last successful mutation.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token; starts at 1.
    pub revision: u32,
}

impl Task {
    /// Produce the next version of this task with `details` applied.
    #[must_use]
    pub fn revised(&self, details: TaskDetails, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            details,
            created_at: self.created_at,
            updated_at: now,
            revision: self.revision.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("not_started", TaskStatus::NotStarted)]
    #[case("in_progress", TaskStatus::InProgress)]
    #[case("done", TaskStatus::Done)]
    fn status_parses_and_displays(#[case] raw: &str, #[case] expected: TaskStatus) {
        let parsed: TaskStatus = raw.parse().expect("known status");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), raw);
    }

    #[rstest]
    #[case("archived")]
    #[case("Done")]
    #[case("")]
    fn status_rejects_unknown_values(#[case] raw: &str) {
        assert_eq!(
            raw.parse::<TaskStatus>(),
            Err(UnknownTaskStatus(raw.to_owned()))
        );
    }
}
