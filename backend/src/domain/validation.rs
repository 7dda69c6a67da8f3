//! Field validation for request payloads.
//!
//! Per-field rules are declared on the payload types with `validator`
//! attributes; rules spanning several fields implement [`CrossFieldRules`].
//! [`validate_payload`] runs both and reports every violation at once, keyed
//! by the JSON spelling of the field.

use validator::{Validate, ValidationErrors};

use super::{Error, FieldErrors};

/// Rules that relate two or more fields of a payload.
pub trait CrossFieldRules {
    /// Violations keyed by JSON field name. Empty when the payload is valid.
    fn cross_field_errors(&self) -> FieldErrors {
        FieldErrors::new()
    }
}

/// Inspect every rule on `payload` and collect all violations.
///
/// # Errors
/// Returns the field to messages mapping when any rule fails.
pub fn check_fields<P>(payload: &P) -> Result<(), FieldErrors>
where
    P: Validate + CrossFieldRules,
{
    let mut violations = payload
        .validate()
        .err()
        .map(|errors| collect_field_errors(&errors))
        .unwrap_or_default();
    for (field, messages) in payload.cross_field_errors() {
        violations.entry(field).or_default().extend(messages);
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate `payload`, returning a [`super::ErrorCode::ValidationFailed`]
/// error on failure.
///
/// # Errors
/// Returns a validation failure listing every violated rule.
pub fn validate_payload<P>(payload: &P) -> Result<(), Error>
where
    P: Validate + CrossFieldRules,
{
    check_fields(payload).map_err(Error::validation_failed)
}

fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, violations)| {
            let name = json_field_name(&field);
            let messages = violations
                .iter()
                .map(|violation| {
                    violation.message.as_ref().map_or_else(
                        || format!("{name} is invalid ({})", violation.code),
                        ToString::to_string,
                    )
                })
                .collect();
            (name, messages)
        })
        .collect()
}

/// Convert a Rust field name to its camelCase JSON spelling.
pub(crate) fn json_field_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            name.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            name.push(ch);
        }
    }
    name
}

/// Unwrap a field the rule set has already marked required.
///
/// # Errors
/// Returns a single-field validation failure when the value is absent.
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::invalid_field(field, format!("{field} is required")))
}

/// Trim a text field; blank input becomes absent, so a required field left
/// blank is reported by its required rule.
pub(crate) fn trim_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
