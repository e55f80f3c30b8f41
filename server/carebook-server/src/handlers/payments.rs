use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use booking_service::Appointment;

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::server::CareBookServer;

/// Payment intent request body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub appointment_id: Uuid,
}

/// Payment intent response; only the client secret is exposed
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    #[schema(example = "pi_6f0c2a_secret_9xk21abc")]
    pub client_secret: String,
}

/// Payment confirmation request body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub appointment_id: Uuid,
    pub payment_intent_id: String,
}

/// Payment confirmation response
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmPaymentResponse {
    #[schema(example = "Payment confirmed successfully")]
    pub message: String,
    /// The appointment after confirmation: status `confirmed`, payment
    /// status `completed`
    #[schema(value_type = Object)]
    pub appointment: Appointment,
}

/// Create a payment intent for an appointment's fee
#[utoipa::path(
    post,
    path = "/api/payments/create-payment-intent",
    tag = "payments",
    request_body = CreateIntentRequest,
    responses(
        (status = 200, description = "Intent created", body = CreateIntentResponse),
        (status = 400, description = "Payment already completed"),
        (status = 403, description = "Caller is not the appointment's patient"),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn create_payment_intent(
    State(server): State<CareBookServer>,
    auth: AuthContext,
    Json(request): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>, ApiError> {
    let intent = server
        .payments
        .create_intent(auth.caller(), request.appointment_id)
        .await?;
    Ok(Json(CreateIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Confirm a payment; completes the payment record and confirms the
/// appointment in one logical operation
#[utoipa::path(
    post,
    path = "/api/payments/confirm",
    tag = "payments",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment confirmed", body = ConfirmPaymentResponse),
        (status = 403, description = "Caller is not the appointment's patient"),
        (status = 404, description = "Appointment or payment not found"),
        (status = 409, description = "Appointment is no longer payable")
    ),
    security(("bearer_token" = []))
)]
pub async fn confirm_payment(
    State(server): State<CareBookServer>,
    auth: AuthContext,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<ConfirmPaymentResponse>, ApiError> {
    let appointment = server
        .payments
        .confirm(
            auth.caller(),
            request.appointment_id,
            &request.payment_intent_id,
        )
        .await?;
    Ok(Json(ConfirmPaymentResponse {
        message: "Payment confirmed successfully".to_string(),
        appointment,
    }))
}
