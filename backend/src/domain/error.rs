//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; every failure raised by the mutation pipeline ends up here with
//! one of the stable [`ErrorCode`] values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Field name to ordered violation messages, keyed by the JSON spelling.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// One or more payload fields broke their declared rules.
    ValidationFailed,
    /// A referenced entity (for example a task owner) does not exist.
    ReferenceNotFound,
    /// A uniqueness constraint would be broken.
    DuplicateKey,
    /// Path identifier and payload identifier disagree.
    IdentifierMismatch,
    /// The addressed resource does not exist.
    NotFound,
    /// The resource changed since it was loaded.
    Conflict,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    const fn fallback_message(self) -> &'static str {
        match self {
            Self::ValidationFailed => "One or more fields are invalid",
            Self::ReferenceNotFound => "Referenced resource does not exist",
            Self::DuplicateKey => "Resource already exists",
            Self::IdentifierMismatch => "Path and payload identifiers differ",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource was modified concurrently",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Domain error payload.
///
/// Serialises as `{"error", "message", "errors"?, "details"?, "traceId"?}`.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `errors` is only present for [`ErrorCode::ValidationFailed`] and is never
///   empty.
///
/// # Examples
/// ```
/// use taskboard::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("task 7 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorBody", into = "ErrorBody")]
pub struct Error {
    code: ErrorCode,
    message: String,
    errors: Option<FieldErrors>,
    details: Option<Value>,
    trace_id: Option<String>,
}

/// Validation errors raised by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was blank.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
    /// A field error map was supplied without any entries.
    #[error("field errors must not be empty")]
    EmptyFieldErrors,
}

impl Error {
    /// Create a new error.
    ///
    /// Blank messages are replaced with a generic message for `code`. Captures
    /// the current trace identifier if one is in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            errors: None,
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Fallible constructor that validates the message content.
    ///
    /// # Errors
    /// Returns [`ErrorValidationError::EmptyMessage`] for blank messages.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::new(code, message))
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Per-field violations for validation failures.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        self.errors.as_ref()
    }

    /// Supplementary structured context.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Correlation identifier for the request that produced this error.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::reference_not_found("user 42 does not exist")
    ///     .with_details(json!({ "field": "userId", "value": 42 }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach a trace identifier to the error.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Build a [`ErrorCode::ValidationFailed`] error carrying `errors`.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::{Error, FieldErrors};
    ///
    /// let mut errors = FieldErrors::new();
    /// errors.insert("status".into(), vec!["status is not recognised".into()]);
    /// let err = Error::validation_failed(errors);
    /// assert!(err.field_errors().is_some_and(|e| e.contains_key("status")));
    /// ```
    #[must_use]
    pub fn validation_failed(errors: FieldErrors) -> Self {
        let mut error = Self::new(
            ErrorCode::ValidationFailed,
            "One or more fields are invalid",
        );
        if !errors.is_empty() {
            error.errors = Some(errors);
        }
        error
    }

    /// Validation failure for a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        Self::validation_failed(errors)
    }

    /// Convenience constructor for [`ErrorCode::ReferenceNotFound`].
    pub fn reference_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReferenceNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateKey`].
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateKey, message)
    }

    /// Convenience constructor for [`ErrorCode::IdentifierMismatch`].
    pub fn identifier_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IdentifierMismatch, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

/// Wire shape of [`Error`], documented in the OpenAPI schema.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ErrorBody {
    #[serde(rename = "error")]
    #[schema(example = "validation_failed")]
    code: ErrorCode,
    #[schema(example = "One or more fields are invalid")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl From<Error> for ErrorBody {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            errors: value.errors,
            details: value.details,
            trace_id: value.trace_id,
        }
    }
}

impl TryFrom<ErrorBody> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorBody) -> Result<Self, Self::Error> {
        let ErrorBody {
            code,
            message,
            errors,
            details,
            trace_id,
        } = value;

        let mut error = Self::try_new(code, message)?;
        if errors.as_ref().is_some_and(BTreeMap::is_empty) {
            return Err(ErrorValidationError::EmptyFieldErrors);
        }
        error.errors = errors;
        error.details = details;
        error.trace_id = match trace_id {
            Some(id) if id.trim().is_empty() => return Err(ErrorValidationError::EmptyTraceId),
            other => other,
        };
        Ok(error)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
