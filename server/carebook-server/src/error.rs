//! API boundary errors
//!
//! Every domain error is converted into an [`ApiError`] here and leaves
//! the process as a `{message}` JSON body with the status code mandated
//! by its [`ErrorCode`] class. Infrastructure detail is logged and
//! replaced with a generic message outside debug builds.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_common::{log_error, ErrorBody, ErrorClass, ErrorCode};

use auth_identity::IdentityError;
use booking_service::BookingError;

/// Error returned by every handler.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCredential, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Infrastructure, message)
    }

    fn from_classified(error: &(dyn std::fmt::Display), code: ErrorCode) -> Self {
        if code.is_public() {
            Self::new(code, error.to_string())
        } else {
            log_error("api", code, error);
            // Diagnostic detail only in non-production builds
            if cfg!(debug_assertions) {
                Self::new(code, error.to_string())
            } else {
                Self::new(code, "Server error")
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(error: IdentityError) -> Self {
        Self::from_classified(&error, error.code())
    }
}

impl From<BookingError> for ApiError {
    fn from(error: BookingError) -> Self {
        Self::from_classified(&error, error.code())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::new(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_errors_keep_their_status_class() {
        let err = ApiError::from(BookingError::AppointmentNotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Appointment not found");

        let err = ApiError::from(BookingError::AlreadyPaid);
        assert_eq!(err.code, ErrorCode::AlreadyPaid);

        let err = ApiError::from(BookingError::NotAuthorized);
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn identity_errors_keep_their_status_class() {
        let err = ApiError::from(IdentityError::InvalidCredentials);
        assert_eq!(err.code, ErrorCode::InvalidCredential);

        let err = ApiError::from(IdentityError::EmailAlreadyInUse);
        assert_eq!(err.code, ErrorCode::Validation);
    }
}
