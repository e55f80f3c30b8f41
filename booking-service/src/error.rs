use error_common::{ErrorClass, ErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Only patients can book appointments")]
    PatientRoleRequired,

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Payment not found")]
    PaymentNotFound,

    #[error("Payment already completed")]
    AlreadyPaid,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: crate::models::AppointmentStatus,
        to: crate::models::AppointmentStatus,
    },

    #[error("Appointment is no longer payable")]
    NotPayable,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payment processor error: {0}")]
    Processor(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ErrorClass for BookingError {
    fn code(&self) -> ErrorCode {
        match self {
            BookingError::PatientRoleRequired | BookingError::NotAuthorized => {
                ErrorCode::Forbidden
            }
            BookingError::AppointmentNotFound | BookingError::PaymentNotFound => {
                ErrorCode::NotFound
            }
            BookingError::AlreadyPaid => ErrorCode::AlreadyPaid,
            BookingError::InvalidTransition { .. } | BookingError::NotPayable => {
                ErrorCode::Conflict
            }
            BookingError::Validation(_) => ErrorCode::Validation,
            BookingError::Processor(_) | BookingError::Storage(_) => ErrorCode::Infrastructure,
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
