//! Tasks API handlers.
//!
//! ```text
//! GET    /api/v1/tasks
//! GET    /api/v1/tasks/{id}
//! POST   /api/v1/tasks {"title":"Write report","status":"not_started","userId":1}
//! PUT    /api/v1/tasks/{id} {"id":4,"title":"Write report","status":"done","userId":1}
//! DELETE /api/v1/tasks/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CreateTaskPayload, ErrorBody, Task, TaskId, UpdateTaskPayload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Task representation returned by the API.
///
/// The owner is referenced by id only; fetch it from `/api/v1/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[schema(example = 4)]
    pub id: i64,
    #[schema(example = "Write report")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "in_progress")]
    pub status: String,
    #[schema(example = 1)]
    pub user_id: i64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Concurrency token; send it back as `expectedRevision` to guard updates.
    #[schema(example = 1)]
    pub revision: u32,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let Task {
            id,
            details,
            created_at,
            updated_at,
            revision,
        } = task;
        Self {
            id: id.get(),
            title: details.title,
            description: details.description,
            status: details.status.as_str().to_owned(),
            user_id: details.user_id.get(),
            started_at: details.started_at,
            finished_at: details.finished_at,
            created_at,
            updated_at,
            revision,
        }
    }
}

fn task_location(id: TaskId) -> String {
    format!("/api/v1/tasks/{id}")
}

/// List every task.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    responses(
        (status = 200, description = "Tasks ordered by id", body = [TaskResponse]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/tasks")]
pub async fn list_tasks(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TaskResponse>>> {
    let tasks = state.tasks_query.list_tasks().await?;
    Ok(web::Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Fetch one task.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(("id" = i64, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["tasks"],
    operation_id = "getTask"
)]
#[get("/tasks/{id}")]
pub async fn get_task(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TaskResponse>> {
    let task = state
        .tasks_query
        .get_task(TaskId::new(path.into_inner()))
        .await?;
    Ok(web::Json(task.into()))
}

/// Create a task owned by an existing user.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskPayload,
    responses(
        (
            status = 201,
            description = "Task created",
            body = TaskResponse,
            headers(("Location" = String, description = "URL of the new task"))
        ),
        (status = 400, description = "Invalid payload or unknown owner", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    payload: web::Json<CreateTaskPayload>,
) -> ApiResult<HttpResponse> {
    let task = state.tasks.create_task(payload.into_inner()).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, task_location(task.id)))
        .json(TaskResponse::from(task)))
}

/// Replace the client-settable fields of a task.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    params(("id" = i64, Path, description = "Task identifier")),
    request_body = UpdateTaskPayload,
    responses(
        (status = 204, description = "Task updated"),
        (
            status = 400,
            description = "Invalid payload, identifier mismatch or unknown owner",
            body = ErrorBody
        ),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 409, description = "Task changed concurrently; reload and retry", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateTaskPayload>,
) -> ApiResult<HttpResponse> {
    state
        .tasks
        .update_task(TaskId::new(path.into_inner()), payload.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = i64, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .tasks
        .delete_task(TaskId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
