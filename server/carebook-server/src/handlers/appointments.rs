use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use booking_service::{Appointment, AppointmentKind, AppointmentStatus, BookingRequest};

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::server::CareBookServer;

/// Booking request body. The patient is always the authenticated
/// caller; any client-supplied patient id is ignored by design.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    /// `in-person` or `virtual`
    #[schema(value_type = String, example = "in-person")]
    pub appointment_type: AppointmentKind,
    #[schema(value_type = f64, example = 150.0)]
    pub consultation_fee: Decimal,
}

/// Status transition request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status, validated against the lifecycle table
    #[schema(value_type = String, example = "confirmed")]
    pub status: AppointmentStatus,
}

/// Cancellation response
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    #[schema(example = "Appointment cancelled successfully")]
    pub message: String,
}

/// Book a new appointment (patient role only)
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created"),
        (status = 403, description = "Only patients can book appointments")
    ),
    security(("bearer_token" = []))
)]
pub async fn create_appointment(
    State(server): State<CareBookServer>,
    auth: AuthContext,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appointment = server
        .booking
        .create(
            auth.caller(),
            BookingRequest {
                doctor_id: request.doctor_id,
                appointment_date: request.appointment_date,
                appointment_type: request.appointment_type,
                consultation_fee: request.consultation_fee,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// List the calling patient's appointments
#[utoipa::path(
    get,
    path = "/api/appointments/patient",
    tag = "appointments",
    responses(
        (status = 200, description = "The caller's appointments, oldest first"),
        (status = 403, description = "Caller is not a patient")
    ),
    security(("bearer_token" = []))
)]
pub async fn list_patient_appointments(
    State(server): State<CareBookServer>,
    auth: AuthContext,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = server.booking.list_for_patient(auth.caller()).await?;
    Ok(Json(appointments))
}

/// List the calling doctor's appointments
#[utoipa::path(
    get,
    path = "/api/appointments/doctor",
    tag = "appointments",
    responses(
        (status = 200, description = "The caller's appointments, oldest first"),
        (status = 403, description = "Caller is not a doctor")
    ),
    security(("bearer_token" = []))
)]
pub async fn list_doctor_appointments(
    State(server): State<CareBookServer>,
    auth: AuthContext,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = server.booking.list_for_doctor(auth.caller()).await?;
    Ok(Json(appointments))
}

/// Transition an appointment's status (assigned doctor only)
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated appointment"),
        (status = 403, description = "Caller is not the assigned doctor"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Transition not allowed from the current status")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_appointment_status(
    State(server): State<CareBookServer>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = server
        .booking
        .set_status(auth.caller(), id, request.status)
        .await?;
    Ok(Json(appointment))
}

/// Cancel an appointment (booking patient or assigned doctor)
#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment cancelled", body = CancelResponse),
        (status = 403, description = "Caller is neither the patient nor the doctor"),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn cancel_appointment(
    State(server): State<CareBookServer>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, ApiError> {
    server.booking.cancel(auth.caller(), id).await?;
    Ok(Json(CancelResponse {
        message: "Appointment cancelled successfully".to_string(),
    }))
}
