use serde::{Deserialize, Serialize};

/// Error taxonomy shared by every CareBook module.
///
/// Domain crates attach one of these codes to their error variants; the
/// HTTP boundary maps the code to a status line without inspecting the
/// variant itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No credential was presented at all
    Unauthenticated,
    /// A credential was presented but is malformed, expired, or unverifiable
    InvalidCredential,
    /// Role or ownership violation
    Forbidden,
    /// Unknown appointment, payment, or user identifier
    NotFound,
    /// Duplicate payment-completion attempt
    AlreadyPaid,
    /// Operation not permitted in the record's current status
    Conflict,
    /// Malformed or semantically invalid input
    Validation,
    /// Storage or external processor unavailable
    Infrastructure,
}

impl ErrorCode {
    /// HTTP status code this error class is reported as.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::Unauthenticated | ErrorCode::InvalidCredential => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::AlreadyPaid | ErrorCode::Validation => 400,
            ErrorCode::Conflict => 409,
            ErrorCode::Infrastructure => 500,
        }
    }

    /// Whether detail for this class may be leaked to callers.
    ///
    /// Infrastructure detail stays in the logs; everything else is a
    /// domain-level message the caller is allowed to see.
    pub fn is_public(self) -> bool {
        !matches!(self, ErrorCode::Infrastructure)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::InvalidCredential => "invalid_credential",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::NotFound => "not_found",
            ErrorCode::AlreadyPaid => "already_paid",
            ErrorCode::Conflict => "conflict",
            ErrorCode::Validation => "validation",
            ErrorCode::Infrastructure => "infrastructure",
        };
        f.write_str(name)
    }
}

/// Implemented by domain error enums so the HTTP boundary can classify
/// them without knowing their variants.
pub trait ErrorClass {
    fn code(&self) -> ErrorCode;
}
