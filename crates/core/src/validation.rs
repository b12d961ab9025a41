//! Helpers for turning `validator` results into client-facing messages.

use validator::ValidationErrors;

use crate::error::CoreError;

/// Flatten field-level validation errors into a single message.
///
/// Fields are visited in name order so the output is stable regardless of
/// the map's iteration order. Errors without a custom message fall back to
/// `"<field> is invalid"`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    let mut messages = Vec::new();
    for field in fields {
        for error in field_errors[field].iter() {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("{field} is invalid")),
            }
        }
    }

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(validation_message(&errors))
    }
}
