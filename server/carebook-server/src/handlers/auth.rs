use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use auth_identity::{CreateUserRequest, DoctorProfile, PublicUser, Role};

use crate::error::ApiError;
use crate::server::CareBookServer;
use crate::validation::RequestValidation;
use crate::{validate_email, validate_length, validate_required};

/// Registration request for a patient or doctor account
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[schema(example = "SecureP@ssw0rd")]
    pub password: String,
    /// Account role, `patient` or `doctor`
    #[schema(value_type = String, example = "patient")]
    pub role: Role,
    /// Specialty for the directory listing, doctor accounts only
    #[schema(example = "Cardiology")]
    pub specialty: Option<String>,
    /// Listed consultation fee, doctor accounts only
    #[schema(value_type = Option<f64>, example = 150.0)]
    pub consultation_fee: Option<Decimal>,
}

impl RequestValidation for RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.first_name, "First name is required");
        validate_required!(self.last_name, "Last name is required");
        validate_email!(self.email, "A valid email address is required");
        validate_length!(
            self.password,
            8,
            128,
            "Password must be between 8 and 128 characters"
        );
        Ok(())
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[schema(example = "SecureP@ssw0rd")]
    pub password: String,
    /// Account role, `patient` or `doctor`
    #[schema(value_type = String, example = "patient")]
    pub role: Role,
}

impl RequestValidation for LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.email, "Email is required");
        validate_required!(self.password, "Password is required");
        Ok(())
    }
}

/// Successful registration or login response
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthSuccessResponse {
    #[schema(example = "Logged in successfully")]
    pub message: String,
    /// Signed bearer token
    pub token: String,
    /// Sanitized account record (no password hash)
    #[schema(value_type = Object)]
    pub user: PublicUser,
}

/// Register a new patient or doctor
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthSuccessResponse),
        (status = 400, description = "Invalid input or email already in use")
    )
)]
pub async fn register(
    State(server): State<CareBookServer>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthSuccessResponse>), ApiError> {
    request.validate()?;

    let session = server
        .identity
        .register(CreateUserRequest {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            role: request.role,
        })
        .await?;

    // A doctor account is immediately discoverable: the directory profile
    // shares the user's id, which is what the profile-ownership check
    // compares against.
    if request.role == Role::Doctor {
        server
            .directory
            .add(directory_profile(&session.user, request.specialty, request.consultation_fee))
            .await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(AuthSuccessResponse {
            message: "User registered successfully".to_string(),
            token: session.token,
            user: session.user,
        }),
    ))
}

/// Log in as a patient or doctor
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in successfully", body = AuthSuccessResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(server): State<CareBookServer>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthSuccessResponse>, ApiError> {
    request.validate()?;

    let session = server
        .identity
        .login(&request.email, &request.password, request.role)
        .await?;

    Ok(Json(AuthSuccessResponse {
        message: "Logged in successfully".to_string(),
        token: session.token,
        user: session.user,
    }))
}

/// Starter directory entry for a freshly registered doctor; the doctor
/// fills in the rest through the profile and schedule endpoints.
fn directory_profile(
    user: &PublicUser,
    specialty: Option<String>,
    consultation_fee: Option<Decimal>,
) -> DoctorProfile {
    DoctorProfile {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        specialty: specialty.unwrap_or_else(|| "General Practice".to_string()),
        location: String::new(),
        bio: String::new(),
        experience: String::new(),
        languages: Vec::new(),
        rating: 0.0,
        reviews: 0,
        consultation_fee: consultation_fee.unwrap_or_else(|| Decimal::from(100)),
        available_days: Vec::new(),
        services: Vec::new(),
        working_hours: None,
    }
}
