//! Tests for the tasks service pipeline.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::TaskStatus;
use crate::domain::ports::{
    MockTaskRepository, MockUserRepository, TaskPersistenceError,
};
use crate::domain::service_test_helpers::{fixture_clock, now, task, user};

#[fixture]
fn create_payload() -> CreateTaskPayload {
    CreateTaskPayload {
        title: Some("  Write report ".to_owned()),
        description: Some("   ".to_owned()),
        status: Some("in_progress".to_owned()),
        user_id: Some(1),
        started_at: None,
        finished_at: None,
    }
}

fn update_payload(id: i64) -> UpdateTaskPayload {
    UpdateTaskPayload {
        id: Some(id),
        title: Some("Write final report".to_owned()),
        description: None,
        status: Some("done".to_owned()),
        user_id: Some(1),
        started_at: None,
        finished_at: None,
        expected_revision: None,
    }
}

fn owner_present() -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(user(id.get(), "ana@example.com", 1))));
    users
}

fn owner_absent() -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));
    users
}

fn service(
    tasks: MockTaskRepository,
    users: MockUserRepository,
) -> TasksService<MockTaskRepository, MockUserRepository> {
    TasksService::new(Arc::new(tasks), Arc::new(users), fixture_clock())
}

#[rstest]
#[tokio::test]
async fn create_trims_and_inserts(create_payload: CreateTaskPayload) {
    let mut tasks = MockTaskRepository::new();
    tasks
        .expect_insert()
        .withf(|details, at| {
            details.title == "Write report"
                && details.description.is_none()
                && details.status == TaskStatus::InProgress
                && *at == now()
        })
        .times(1)
        .return_once(|_, _| Ok(task(10, 1, 1)));

    let created = service(tasks, owner_present())
        .create_task(create_payload)
        .await
        .expect("task created");

    assert_eq!(created.id, TaskId::new(10));
}

#[rstest]
#[tokio::test]
async fn create_with_missing_owner_never_inserts(create_payload: CreateTaskPayload) {
    let mut tasks = MockTaskRepository::new();
    tasks.expect_insert().times(0);

    let error = service(tasks, owner_absent())
        .create_task(create_payload)
        .await
        .expect_err("owner missing");

    assert_eq!(error.code(), ErrorCode::ReferenceNotFound);
    assert_eq!(error.message(), "user 1 does not exist");
}

#[rstest]
#[tokio::test]
async fn create_with_unknown_status_is_validation_failure(create_payload: CreateTaskPayload) {
    let payload = CreateTaskPayload {
        status: Some("archived".to_owned()),
        ..create_payload
    };

    let error = service(MockTaskRepository::new(), MockUserRepository::new())
        .create_task(payload)
        .await
        .expect_err("invalid status");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert!(error.field_errors().is_some_and(|e| e.contains_key("status")));
}

#[rstest]
#[tokio::test]
async fn owner_deleted_before_commit_is_reference_not_found(create_payload: CreateTaskPayload) {
    let mut tasks = MockTaskRepository::new();
    tasks
        .expect_insert()
        .times(1)
        .return_once(|_, _| Err(TaskPersistenceError::owner_missing(1_i64)));

    let error = service(tasks, owner_present())
        .create_task(create_payload)
        .await
        .expect_err("fk violation");

    assert_eq!(error.code(), ErrorCode::ReferenceNotFound);
}

#[rstest]
#[tokio::test]
async fn update_with_mismatched_id_touches_no_store() {
    let error = service(MockTaskRepository::new(), MockUserRepository::new())
        .update_task(TaskId::new(3), update_payload(4))
        .await
        .expect_err("mismatch");

    assert_eq!(error.code(), ErrorCode::IdentifierMismatch);
}

#[rstest]
#[tokio::test]
async fn invalid_update_reports_validation_before_mismatch() {
    let payload = UpdateTaskPayload {
        title: None,
        ..update_payload(4)
    };

    let error = service(MockTaskRepository::new(), MockUserRepository::new())
        .update_task(TaskId::new(3), payload)
        .await
        .expect_err("invalid");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
}

#[rstest]
#[tokio::test]
async fn update_with_missing_owner_leaves_task_untouched() {
    let mut tasks = MockTaskRepository::new();
    tasks.expect_find_by_id().times(0);
    tasks.expect_update().times(0);

    let error = service(tasks, owner_absent())
        .update_task(TaskId::new(3), update_payload(3))
        .await
        .expect_err("owner missing");

    assert_eq!(error.code(), ErrorCode::ReferenceNotFound);
}

#[rstest]
#[tokio::test]
async fn update_commits_with_loaded_revision_guard() {
    let mut tasks = MockTaskRepository::new();
    tasks
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(task(3, 1, 2))));
    tasks
        .expect_update()
        .withf(|next, expected| {
            *expected == 2
                && next.revision == 3
                && next.details.status == TaskStatus::Done
                && next.updated_at == now()
        })
        .times(1)
        .return_once(|_, _| Ok(UpdateOutcome::Applied));

    let updated = service(tasks, owner_present())
        .update_task(TaskId::new(3), update_payload(3))
        .await
        .expect("task updated");

    assert_eq!(updated.details.title, "Write final report");
}

#[rstest]
#[case(Some(5), ErrorCode::Conflict)]
#[case(None, ErrorCode::NotFound)]
#[tokio::test]
async fn stale_commit_is_disambiguated(
    #[case] reloaded_revision: Option<u32>,
    #[case] expected: ErrorCode,
) {
    let mut tasks = MockTaskRepository::new();
    let mut reads = vec![
        Some(task(3, 1, 4)),
        reloaded_revision.map(|revision| task(3, 1, revision)),
    ]
    .into_iter();
    tasks
        .expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(reads.next().flatten()));
    tasks
        .expect_update()
        .times(1)
        .return_once(|_, _| Ok(UpdateOutcome::Stale));

    let error = service(tasks, owner_present())
        .update_task(TaskId::new(3), update_payload(3))
        .await
        .expect_err("stale commit");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_task_is_not_found() {
    let mut tasks = MockTaskRepository::new();
    tasks.expect_find_by_id().times(1).return_once(|_| Ok(None));
    tasks.expect_delete().times(0);

    let error = service(tasks, MockUserRepository::new())
        .delete_task(TaskId::new(8))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_removes_existing_task() {
    let mut tasks = MockTaskRepository::new();
    tasks
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(task(8, 1, 1))));
    tasks.expect_delete().times(1).return_once(|_| Ok(true));

    service(tasks, MockUserRepository::new())
        .delete_task(TaskId::new(8))
        .await
        .expect("task deleted");
}

#[rstest]
#[tokio::test]
async fn tasks_for_unknown_user_is_not_found() {
    let mut tasks = MockTaskRepository::new();
    tasks.expect_list_by_owner().times(0);

    let error = service(tasks, owner_absent())
        .list_tasks_for_user(UserId::new(2))
        .await
        .expect_err("unknown user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn tasks_for_user_are_listed() {
    let mut tasks = MockTaskRepository::new();
    tasks
        .expect_list_by_owner()
        .times(1)
        .return_once(|owner| Ok(vec![task(1, owner.get(), 1), task(2, owner.get(), 1)]));

    let listed = service(tasks, owner_present())
        .list_tasks_for_user(UserId::new(2))
        .await
        .expect("tasks listed");

    assert_eq!(listed.len(), 2);
}
