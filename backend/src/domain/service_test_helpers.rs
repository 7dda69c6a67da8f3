//! Shared builders for service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{EmailAddress, Task, TaskDetails, TaskId, TaskStatus, User, UserId, UserProfile};

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0)
        .single()
        .expect("valid creation instant")
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0)
        .single()
        .expect("valid current instant")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now: now() })
}

pub(crate) fn user(id: i64, email: &str, revision: u32) -> User {
    User {
        id: UserId::new(id),
        profile: UserProfile {
            name: "Ana Silva".to_owned(),
            email: EmailAddress::normalised(email),
            birth_date: None,
            occupation: None,
        },
        created_at: created_at(),
        updated_at: created_at(),
        revision,
    }
}

pub(crate) fn task(id: i64, owner: i64, revision: u32) -> Task {
    Task {
        id: TaskId::new(id),
        details: TaskDetails {
            title: "Write report".to_owned(),
            description: None,
            status: TaskStatus::NotStarted,
            user_id: UserId::new(owner),
            started_at: None,
            finished_at: None,
        },
        created_at: created_at(),
        updated_at: created_at(),
        revision,
    }
}
