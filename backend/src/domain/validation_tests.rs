//! Rule coverage for the request payloads.

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    CreateTaskPayload, CreateUserPayload, ErrorCode, TaskStatus, UpdateTaskPayload,
    UpdateUserPayload,
};

#[fixture]
fn valid_user() -> CreateUserPayload {
    CreateUserPayload {
        name: Some("Ana Silva".to_owned()),
        email: Some("Ana@Example.com".to_owned()),
        birth_date: None,
        occupation: Some("Engineer".to_owned()),
    }
}

#[fixture]
fn valid_task() -> CreateTaskPayload {
    CreateTaskPayload {
        title: Some("Write report".to_owned()),
        description: None,
        status: Some("not_started".to_owned()),
        user_id: Some(1),
        started_at: None,
        finished_at: None,
    }
}

fn fields(errors: &FieldErrors) -> Vec<&str> {
    errors.keys().map(String::as_str).collect()
}

#[rstest]
fn valid_user_passes(valid_user: CreateUserPayload) {
    assert!(check_fields(&valid_user.normalised()).is_ok());
}

#[rstest]
fn valid_task_passes(valid_task: CreateTaskPayload) {
    assert!(check_fields(&valid_task.normalised()).is_ok());
}

#[rstest]
fn empty_user_reports_every_required_field() {
    let errors = check_fields(&CreateUserPayload::default()).expect_err("invalid payload");
    assert_eq!(fields(&errors), vec!["email", "name"]);
    assert_eq!(errors["name"], vec!["name is required".to_owned()]);
}

#[rstest]
fn all_user_violations_are_collected(valid_user: CreateUserPayload) {
    let payload = CreateUserPayload {
        name: Some("Al".to_owned()),
        email: Some("not-an-email".to_owned()),
        occupation: Some("x".repeat(101)),
        ..valid_user
    };
    let errors = check_fields(&payload).expect_err("invalid payload");
    assert_eq!(fields(&errors), vec!["email", "name", "occupation"]);
    assert_eq!(
        errors["email"],
        vec!["email must be a valid email address".to_owned()]
    );
}

#[rstest]
#[case("x".repeat(3), true)]
#[case("x".repeat(100), true)]
#[case("x".repeat(2), false)]
#[case("x".repeat(101), false)]
#[case("  ab  ".to_owned(), false)]
fn user_name_length_bounds(
    valid_user: CreateUserPayload,
    #[case] name: String,
    #[case] accepted: bool,
) {
    let payload = CreateUserPayload {
        name: Some(name),
        ..valid_user
    }
    .normalised();
    assert_eq!(check_fields(&payload).is_ok(), accepted);
}

#[rstest]
fn long_email_is_rejected(valid_user: CreateUserPayload) {
    let payload = CreateUserPayload {
        email: Some(format!("{}@example.com", "a".repeat(95))),
        ..valid_user
    };
    let errors = check_fields(&payload).expect_err("invalid payload");
    assert!(
        errors["email"].contains(&"email must be at most 100 characters".to_owned())
    );
}

#[rstest]
#[case(Some(0))]
#[case(Some(-4))]
#[case(None)]
fn update_user_requires_positive_id(valid_user: CreateUserPayload, #[case] id: Option<i64>) {
    let payload = UpdateUserPayload {
        id,
        name: valid_user.name,
        email: valid_user.email,
        birth_date: None,
        occupation: None,
        expected_revision: None,
    };
    let errors = check_fields(&payload).expect_err("invalid payload");
    assert_eq!(fields(&errors), vec!["id"]);
}

#[rstest]
#[case("archived")]
#[case("DONE")]
#[case("done ")]
fn unknown_status_is_named(valid_task: CreateTaskPayload, #[case] status: &str) {
    let payload = CreateTaskPayload {
        status: Some(status.to_owned()),
        ..valid_task
    };
    let errors = check_fields(&payload).expect_err("invalid payload");
    assert_eq!(fields(&errors), vec!["status"]);
    assert_eq!(
        errors["status"],
        vec!["status must be one of not_started, in_progress, done".to_owned()]
    );
}

#[rstest]
fn task_field_names_use_json_spelling(valid_task: CreateTaskPayload) {
    let payload = CreateTaskPayload {
        user_id: Some(0),
        description: Some("d".repeat(501)),
        ..valid_task
    };
    let errors = check_fields(&payload).expect_err("invalid payload");
    assert_eq!(fields(&errors), vec!["description", "userId"]);
}

#[rstest]
fn finished_before_started_is_rejected(valid_task: CreateTaskPayload) {
    let started = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).single().expect("instant");
    let finished = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("instant");
    let payload = UpdateTaskPayload {
        id: Some(1),
        title: valid_task.title,
        description: None,
        status: valid_task.status,
        user_id: valid_task.user_id,
        started_at: Some(started),
        finished_at: Some(finished),
        expected_revision: None,
    };
    let errors = check_fields(&payload).expect_err("invalid payload");
    assert_eq!(
        errors["finishedAt"],
        vec!["finishedAt must not precede startedAt".to_owned()]
    );
}

#[rstest]
fn validate_payload_builds_validation_error() {
    let error = validate_payload(&CreateTaskPayload::default()).expect_err("invalid payload");
    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    let errors = error.field_errors().expect("field errors present");
    assert_eq!(fields(errors), vec!["status", "title", "userId"]);
}

#[rstest]
fn normalised_user_converts_to_profile(valid_user: CreateUserPayload) {
    let payload = CreateUserPayload {
        name: Some("  Ana Silva ".to_owned()),
        occupation: Some("   ".to_owned()),
        ..valid_user
    }
    .normalised();
    let profile = payload.into_profile().expect("valid profile");
    assert_eq!(profile.name, "Ana Silva");
    assert_eq!(profile.email.as_str(), "ana@example.com");
    assert!(profile.occupation.is_none());
}

#[rstest]
fn normalised_task_converts_to_details(valid_task: CreateTaskPayload) {
    let details = valid_task.normalised().into_details().expect("valid details");
    assert_eq!(details.status, TaskStatus::NotStarted);
    assert_eq!(details.user_id.get(), 1);
}

#[rstest]
#[case("user_id", "userId")]
#[case("finished_at", "finishedAt")]
#[case("expected_revision", "expectedRevision")]
#[case("title", "title")]
fn json_field_name_is_camel_case(#[case] field: &str, #[case] expected: &str) {
    assert_eq!(json_field_name(field), expected);
}

#[rstest]
fn payloads_reject_server_assigned_fields() {
    let body = serde_json::json!({
        "name": "Ana Silva",
        "email": "ana@example.com",
        "createdAt": "2024-01-01T00:00:00Z",
    });
    assert!(serde_json::from_value::<CreateUserPayload>(body).is_err());
}
