//! Users API handlers.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users {"name":"Ana Silva","email":"ana@example.com"}
//! PUT    /api/v1/users/{id} {"id":1,"name":"Ana Silva","email":"ana@example.com"}
//! DELETE /api/v1/users/{id}
//! GET    /api/v1/users/{id}/tasks
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CreateUserPayload, ErrorBody, UpdateUserPayload, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tasks::TaskResponse;

/// User representation returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ana Silva")]
    pub name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub occupation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Concurrency token; send it back as `expectedRevision` to guard updates.
    #[schema(example = 1)]
    pub revision: u32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            profile,
            created_at,
            updated_at,
            revision,
        } = user;
        Self {
            id: id.get(),
            name: profile.name,
            email: profile.email.as_str().to_owned(),
            birth_date: profile.birth_date,
            occupation: profile.occupation,
            created_at,
            updated_at,
            revision,
        }
    }
}

/// Canonical location of user `id`.
fn user_location(id: UserId) -> String {
    format!("/api/v1/users/{id}")
}

/// List every user.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users ordered by id", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .users_query
        .get_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(user.into()))
}

/// Create a user.
///
/// The email is stored trimmed and lowercased and must be unique regardless
/// of case.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserPayload,
    responses(
        (
            status = 201,
            description = "User created",
            body = UserResponse,
            headers(("Location" = String, description = "URL of the new user"))
        ),
        (status = 400, description = "Invalid payload or duplicate email", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserPayload>,
) -> ApiResult<HttpResponse> {
    let user = state.users.create_user(payload.into_inner()).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, user_location(user.id)))
        .json(UserResponse::from(user)))
}

/// Replace the client-settable fields of a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserPayload,
    responses(
        (status = 204, description = "User updated"),
        (
            status = 400,
            description = "Invalid payload, identifier mismatch or duplicate email",
            body = ErrorBody
        ),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 409, description = "User changed concurrently; reload and retry", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserPayload>,
) -> ApiResult<HttpResponse> {
    state
        .users
        .update_user(UserId::new(path.into_inner()), payload.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a user and every task it owns.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .users
        .delete_user(UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List the tasks owned by a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/tasks",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Tasks owned by the user", body = [TaskResponse]),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUserTasks"
)]
#[get("/users/{id}/tasks")]
pub async fn list_user_tasks(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<TaskResponse>>> {
    let tasks = state
        .tasks_query
        .list_tasks_for_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
