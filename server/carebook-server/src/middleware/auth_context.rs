//! Authentication context extraction
//!
//! Extracts the caller's identity from the `Authorization: Bearer`
//! header via the identity service, so handlers never parse tokens
//! themselves. Authentication only; the booking workflows enforce
//! authorization.

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use uuid::Uuid;

use auth_identity::Role;
use booking_service::Caller;

use crate::error::ApiError;
use crate::server::CareBookServer;

/// Authenticated caller derived from the presented bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: Uuid,
    pub role: Role,
}

impl AuthContext {
    /// View of this caller for the booking workflows.
    pub fn caller(&self) -> Caller {
        let role = match self.role {
            Role::Patient => booking_service::Role::Patient,
            Role::Doctor => booking_service::Role::Doctor,
        };
        Caller { subject: self.subject, role }
    }

    /// Fail with 403 unless the caller has the given role.
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden("Not authorized"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    CareBookServer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let server = CareBookServer::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthenticated("No token, authorization denied"))?;

        let claims = server
            .identity
            .verify_token(token)
            .map_err(|_| ApiError::invalid_credential("Token is not valid"))?;
        let subject = claims
            .subject()
            .map_err(|_| ApiError::invalid_credential("Token is not valid"))?;

        Ok(AuthContext { subject, role: claims.role })
    }
}
