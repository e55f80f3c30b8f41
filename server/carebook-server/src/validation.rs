//! Request validation helpers
//!
//! Handlers validate their request bodies before touching any workflow,
//! so malformed input never reaches the domain layer.

use crate::error::ApiError;

/// Implemented by request DTOs that carry validation rules.
pub trait RequestValidation {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Fail with 400 when a string field is empty.
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        if $field.trim().is_empty() {
            return Err($crate::error::ApiError::bad_request($message));
        }
    };
}

/// Fail with 400 when a string field is outside the given length bounds.
#[macro_export]
macro_rules! validate_length {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        if $field.len() < $min || $field.len() > $max {
            return Err($crate::error::ApiError::bad_request($message));
        }
    };
}

/// Fail with 400 when a field does not look like an email address.
#[macro_export]
macro_rules! validate_email {
    ($field:expr, $message:expr) => {
        if !$field.contains('@') || !$field.contains('.') {
            return Err($crate::error::ApiError::bad_request($message));
        }
    };
}
