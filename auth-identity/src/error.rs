use error_common::{ErrorClass, ErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists with this email")]
    EmailAlreadyInUse,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password too weak")]
    WeakPassword,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Hashing error")]
    HashingError,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ErrorClass for IdentityError {
    fn code(&self) -> ErrorCode {
        match self {
            IdentityError::InvalidCredentials
            | IdentityError::TokenExpired
            | IdentityError::InvalidToken => ErrorCode::InvalidCredential,
            IdentityError::EmailAlreadyInUse
            | IdentityError::InvalidEmail
            | IdentityError::WeakPassword => ErrorCode::Validation,
            IdentityError::UserNotFound | IdentityError::DoctorNotFound => ErrorCode::NotFound,
            IdentityError::HashingError | IdentityError::Internal(_) => ErrorCode::Infrastructure,
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
