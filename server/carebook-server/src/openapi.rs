use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::CareBookServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,

        // Authentication endpoints
        crate::handlers::auth::register,
        crate::handlers::auth::login,

        // Doctor directory endpoints
        crate::handlers::doctors::list_doctors,
        crate::handlers::doctors::get_doctor,
        crate::handlers::doctors::get_doctor_availability,
        crate::handlers::doctors::update_doctor_profile,
        crate::handlers::doctors::update_doctor_schedule,

        // Appointment endpoints
        crate::handlers::appointments::create_appointment,
        crate::handlers::appointments::list_patient_appointments,
        crate::handlers::appointments::list_doctor_appointments,
        crate::handlers::appointments::update_appointment_status,
        crate::handlers::appointments::cancel_appointment,

        // Payment endpoints
        crate::handlers::payments::create_payment_intent,
        crate::handlers::payments::confirm_payment,
    ),
    components(
        schemas(
            // Health schemas
            crate::handlers::health::HealthResponse,

            // Authentication schemas
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::AuthSuccessResponse,

            // Doctor directory schemas
            crate::handlers::doctors::UpdateDoctorRequest,
            crate::handlers::doctors::UpdateScheduleRequest,

            // Appointment schemas
            crate::handlers::appointments::CreateAppointmentRequest,
            crate::handlers::appointments::UpdateStatusRequest,
            crate::handlers::appointments::CancelResponse,

            // Payment schemas
            crate::handlers::payments::CreateIntentRequest,
            crate::handlers::payments::CreateIntentResponse,
            crate::handlers::payments::ConfirmPaymentRequest,
            crate::handlers::payments::ConfirmPaymentResponse,
        )
    ),
    modifiers(&BearerTokenAddon),
    tags(
        (name = "health", description = "System health and status endpoints"),
        (name = "auth", description = "Patient and doctor account registration and login"),
        (name = "doctors", description = "Public doctor directory"),
        (name = "appointments", description = "Appointment booking and lifecycle management"),
        (name = "payments", description = "Consultation fee payment workflow"),
    ),
    info(
        title = "CareBook Engine API",
        version = "0.1.0",
        description = "Appointment booking platform API providing patient and doctor accounts, appointment scheduling, and consultation fee payments.",
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server"),
    ),
)]
pub struct ApiDoc;

/// Registers the `bearer_token` security scheme referenced by the
/// protected endpoints.
pub struct BearerTokenAddon;

impl Modify for BearerTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create OpenAPI documentation routes
pub fn create_docs_routes() -> Router<CareBookServer> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
