//! JWT credential issuance and verification
//!
//! Tokens are HS256-signed bearer credentials carrying the subject id and
//! role. Verification checks signature, expiry, and issuer; it does not
//! consult any store, so a token remains a per-request derived identity
//! rather than a persisted entity.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::IdentityConfig;
use crate::error::{IdentityError, Result};
use crate::models::Role;

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Caller role
    pub role: Role,
    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(subject: Uuid, role: Role, issuer: String, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject.to_string(),
            role,
            iat: now,
            exp: now + ttl.num_seconds(),
            iss: issuer,
        }
    }

    /// Get the subject id as a UUID.
    pub fn subject(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| IdentityError::InvalidToken)
    }
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            ttl: Duration::days(config.token_ttl_days),
        }
    }

    /// Issue a signed token for the given subject and role.
    pub fn issue(&self, subject: Uuid, role: Role) -> Result<(String, TokenClaims)> {
        let claims = TokenClaims::new(subject, role, self.issuer.clone(), self.ttl);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::Internal(e.into()))?;
        Ok((token, claims))
    }

    /// Verify a presented token and return its claims.
    ///
    /// # Errors
    ///
    /// `TokenExpired` for an out-of-date token, `InvalidToken` for anything
    /// else that fails validation (bad signature, wrong issuer, garbage).
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::TokenExpired,
                _ => IdentityError::InvalidToken,
            })
    }
}
