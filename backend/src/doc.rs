//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every users, tasks and health endpoint together with
//! the request payloads, response bodies and the shared error body. Swagger UI
//! serves it under `/docs` in debug builds.

use utoipa::OpenApi;

use crate::domain::{
    CreateTaskPayload, CreateUserPayload, ErrorBody, ErrorCode, UpdateTaskPayload,
    UpdateUserPayload,
};
use crate::inbound::http::tasks::TaskResponse;
use crate::inbound::http::users::UserResponse;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskboard API",
        description = "Users and the tasks they own, with checked, revision-guarded mutations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::list_user_tasks,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::get_task,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::store,
    ),
    components(schemas(
        UserResponse,
        TaskResponse,
        CreateUserPayload,
        UpdateUserPayload,
        CreateTaskPayload,
        UpdateTaskPayload,
        ErrorBody,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Users and their tasks"),
        (name = "tasks", description = "Tasks owned by users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("ErrorBody", "error")]
    #[case("ErrorBody", "traceId")]
    #[case("UserResponse", "revision")]
    #[case("TaskResponse", "userId")]
    #[case("UpdateTaskPayload", "expectedRevision")]
    fn schemas_expose_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/api/v1/users/{id}")]
    #[case("/api/v1/users/{id}/tasks")]
    #[case("/api/v1/tasks")]
    #[case("/api/v1/tasks/{id}")]
    #[case("/health/store")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
