//! Domain primitives, the mutation pipeline, and the ports it drives.
//!
//! Purpose: keep users, tasks and their checks independent of HTTP and
//! storage. Inbound adapters hand raw payloads to the services; outbound
//! adapters implement the repository ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: failure taxonomy shared by every endpoint.
//! - `User`, `Task` and their identifiers: persisted entities.
//! - `*Payload`: request bodies with declarative field rules.
//! - `UsersService`, `TasksService`: validation, integrity checks and the
//!   revision-guarded executor.

pub mod error;
pub mod integrity;
pub mod mutation;
pub mod payloads;
mod persistence_errors;
pub mod ports;
pub mod task;
pub mod tasks_service;
pub mod trace_id;
pub mod user;
pub mod users_service;
pub mod validation;

#[cfg(test)]
pub(crate) mod service_test_helpers;

pub use self::error::{
    Error, ErrorBody, ErrorCode, ErrorValidationError, FieldErrors, TRACE_ID_HEADER,
};
pub use self::integrity::IntegrityChecker;
pub use self::payloads::{
    CreateTaskPayload, CreateUserPayload, UpdateTaskPayload, UpdateUserPayload,
};
pub use self::persistence_errors::owner_missing;
pub use self::task::{Task, TaskDetails, TaskId, TaskStatus, UnknownTaskStatus};
pub use self::tasks_service::TasksService;
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserId, UserProfile};
pub use self::users_service::UsersService;
