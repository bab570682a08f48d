//! Validation Utilities

use validator::ValidationErrors;

use super::error::ClientError;

/// Convert validation errors to a single inline message.
///
/// Form errors are shown on one line, so only the first message is kept.
pub fn validation_error(errors: ValidationErrors) -> ClientError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect();
    messages.sort();
    messages.dedup();

    let message = messages
        .into_iter()
        .next()
        .unwrap_or_else(|| "Validation failed".into());

    ClientError::Validation(message)
}
