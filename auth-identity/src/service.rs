use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::IdentityConfig;
use crate::error::{IdentityError, Result};
use crate::models::{AuthSession, CreateUserRequest, PublicUser, Role, User};
use crate::repository::UserRepository;
use crate::tokens::{TokenClaims, TokenService};

/// Registration, login, and token verification for patients and doctors.
pub struct IdentityService {
    user_repo: Arc<dyn UserRepository>,
    tokens: TokenService,
    config: IdentityConfig,
    argon2: Argon2<'static>,
}

impl IdentityService {
    pub fn new(user_repo: Arc<dyn UserRepository>, config: IdentityConfig) -> Self {
        Self {
            user_repo,
            tokens: TokenService::new(&config),
            config,
            argon2: Argon2::default(),
        }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new patient or doctor account and issue a credential.
    pub async fn register(&self, request: CreateUserRequest) -> Result<AuthSession> {
        if !self.is_valid_email(&request.email) {
            return Err(IdentityError::InvalidEmail);
        }
        if request.password.len() < self.config.password_min_length {
            return Err(IdentityError::WeakPassword);
        }
        if self
            .user_repo
            .find_by_email(&request.email, request.role)
            .await?
            .is_some()
        {
            return Err(IdentityError::EmailAlreadyInUse);
        }

        let password_hash = self.hash_password(&request.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password_hash,
            role: request.role,
            created_at: now,
            updated_at: now,
        };

        let user = self.user_repo.create_user(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "registered new user");
        self.open_session(&user)
    }

    /// Authenticate by email and password within the given role pool.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<AuthSession> {
        let user = self
            .user_repo
            .find_by_email(email, role)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        self.verify_password(password, &user.password_hash)?;
        tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
        self.open_session(&user)
    }

    /// Resolve a bearer token to its claims.
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims> {
        self.tokens.verify(token)
    }

    fn open_session(&self, user: &User) -> Result<AuthSession> {
        let (token, claims) = self.tokens.issue(user.id, user.role)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or(IdentityError::InvalidToken)?;
        Ok(AuthSession {
            user: PublicUser::from(user),
            token,
            expires_at,
        })
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| IdentityError::HashingError)?
            .to_string();
        Ok(password_hash)
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::HashingError)?;
        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| IdentityError::InvalidCredentials)
    }

    fn is_valid_email(&self, email: &str) -> bool {
        email.contains('@') && email.contains('.')
    }
}
