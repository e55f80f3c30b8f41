use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use auth_identity::{
    DoctorAvailability, DoctorProfile, DoctorProfilePatch, DoctorSearchFilters, Role,
};

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::server::CareBookServer;

/// Availability query; the date picks the weekday checked against the
/// doctor's schedule.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

/// Profile update body; absent fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    #[schema(example = "Cardiology")]
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub experience: Option<String>,
    pub languages: Option<Vec<String>>,
    #[schema(value_type = Option<f64>, example = 150.0)]
    pub consultation_fee: Option<Decimal>,
    pub services: Option<Vec<String>>,
}

/// Schedule update body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub available_days: Option<Vec<String>>,
    #[schema(example = "09:00 AM - 05:00 PM")]
    pub working_hours: Option<String>,
}

/// List doctors, optionally filtered by specialty and name
#[utoipa::path(
    get,
    path = "/api/doctors",
    tag = "doctors",
    params(
        ("specialty" = Option<String>, Query, description = "Exact specialty, case-insensitive"),
        ("name" = Option<String>, Query, description = "Substring of the doctor's full name")
    ),
    responses(
        (status = 200, description = "Matching doctor profiles")
    )
)]
pub async fn list_doctors(
    State(server): State<CareBookServer>,
    Query(filters): Query<DoctorSearchFilters>,
) -> Result<Json<Vec<DoctorProfile>>, ApiError> {
    let doctors = server.directory.search(filters).await?;
    Ok(Json(doctors))
}

/// Fetch a single doctor profile
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    tag = "doctors",
    params(("id" = Uuid, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor profile"),
        (status = 404, description = "Doctor not found")
    )
)]
pub async fn get_doctor(
    State(server): State<CareBookServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<DoctorProfile>, ApiError> {
    let doctor = server.directory.find_by_id(id).await?;
    Ok(Json(doctor))
}

/// Check a doctor's availability for a specific date
#[utoipa::path(
    get,
    path = "/api/doctors/{id}/availability",
    tag = "doctors",
    params(
        ("id" = Uuid, Path, description = "Doctor id"),
        ("date" = String, Query, description = "Date to check, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Availability verdict with slots when available"),
        (status = 404, description = "Doctor not found")
    )
)]
pub async fn get_doctor_availability(
    State(server): State<CareBookServer>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<DoctorAvailability>, ApiError> {
    let doctor = server.directory.find_by_id(id).await?;
    Ok(Json(doctor.availability_on(query.date)))
}

/// Update a doctor profile (the doctor's own only)
#[utoipa::path(
    put,
    path = "/api/doctors/{id}",
    tag = "doctors",
    params(("id" = Uuid, Path, description = "Doctor id")),
    request_body = UpdateDoctorRequest,
    responses(
        (status = 200, description = "Updated doctor profile"),
        (status = 403, description = "Caller is not this doctor"),
        (status = 404, description = "Doctor not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_doctor_profile(
    State(server): State<CareBookServer>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<DoctorProfile>, ApiError> {
    authorize_own_profile(&auth, id)?;
    let doctor = server
        .directory
        .update(
            id,
            DoctorProfilePatch {
                specialty: request.specialty,
                location: request.location,
                bio: request.bio,
                experience: request.experience,
                languages: request.languages,
                consultation_fee: request.consultation_fee,
                services: request.services,
                ..DoctorProfilePatch::default()
            },
        )
        .await?;
    Ok(Json(doctor))
}

/// Update a doctor's schedule (the doctor's own only)
#[utoipa::path(
    put,
    path = "/api/doctors/{id}/schedule",
    tag = "doctors",
    params(("id" = Uuid, Path, description = "Doctor id")),
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Updated doctor profile"),
        (status = 403, description = "Caller is not this doctor"),
        (status = 404, description = "Doctor not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_doctor_schedule(
    State(server): State<CareBookServer>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<DoctorProfile>, ApiError> {
    authorize_own_profile(&auth, id)?;
    let doctor = server
        .directory
        .update(
            id,
            DoctorProfilePatch {
                available_days: request.available_days,
                working_hours: request.working_hours,
                ..DoctorProfilePatch::default()
            },
        )
        .await?;
    Ok(Json(doctor))
}

/// Directory profiles are keyed by the doctor's user id, so ownership is
/// subject equality.
fn authorize_own_profile(auth: &AuthContext, id: Uuid) -> Result<(), ApiError> {
    auth.require_role(Role::Doctor)?;
    if auth.subject != id {
        return Err(ApiError::forbidden("Not authorized"));
    }
    Ok(())
}
