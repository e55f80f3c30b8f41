use serde::{Deserialize, Serialize};

use crate::codes::ErrorCode;

/// Wire-level error payload: `{"message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Log an error with its classification before it crosses the API boundary.
pub fn log_error(context: &str, code: ErrorCode, error: &dyn std::fmt::Display) {
    tracing::error!(
        context = context,
        error_code = %code,
        error = %error,
        "request failed"
    );
}
