use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    handlers::{appointments, auth, doctors, health, payments},
    server::CareBookServer,
};

/// Route path constants, grouped by concern.
pub mod paths {
    pub mod health {
        pub const HEALTH: &str = "/api/health";
    }

    pub mod auth {
        pub const REGISTER: &str = "/api/auth/register";
        pub const LOGIN: &str = "/api/auth/login";
    }

    pub mod doctors {
        pub const DOCTORS: &str = "/api/doctors";
        pub const DOCTOR_BY_ID: &str = "/api/doctors/:id";
        pub const AVAILABILITY: &str = "/api/doctors/:id/availability";
        pub const SCHEDULE: &str = "/api/doctors/:id/schedule";
    }

    pub mod appointments {
        pub const APPOINTMENTS: &str = "/api/appointments";
        pub const PATIENT: &str = "/api/appointments/patient";
        pub const DOCTOR: &str = "/api/appointments/doctor";
        pub const STATUS: &str = "/api/appointments/:id/status";
        pub const BY_ID: &str = "/api/appointments/:id";
    }

    pub mod payments {
        pub const CREATE_INTENT: &str = "/api/payments/create-payment-intent";
        pub const CONFIRM: &str = "/api/payments/confirm";
    }
}

/// Create health check routes
pub fn health_routes() -> Router<CareBookServer> {
    Router::new().route(paths::health::HEALTH, get(health::health_check))
}

/// Create authentication routes
pub fn auth_routes() -> Router<CareBookServer> {
    Router::new()
        .route(paths::auth::REGISTER, post(auth::register))
        .route(paths::auth::LOGIN, post(auth::login))
}

/// Create doctor directory routes
pub fn doctor_routes() -> Router<CareBookServer> {
    Router::new()
        .route(paths::doctors::DOCTORS, get(doctors::list_doctors))
        .route(
            paths::doctors::DOCTOR_BY_ID,
            get(doctors::get_doctor).put(doctors::update_doctor_profile),
        )
        .route(
            paths::doctors::AVAILABILITY,
            get(doctors::get_doctor_availability),
        )
        .route(
            paths::doctors::SCHEDULE,
            put(doctors::update_doctor_schedule),
        )
}

/// Create appointment routes
pub fn appointment_routes() -> Router<CareBookServer> {
    Router::new()
        .route(
            paths::appointments::APPOINTMENTS,
            post(appointments::create_appointment),
        )
        .route(
            paths::appointments::PATIENT,
            get(appointments::list_patient_appointments),
        )
        .route(
            paths::appointments::DOCTOR,
            get(appointments::list_doctor_appointments),
        )
        .route(
            paths::appointments::STATUS,
            put(appointments::update_appointment_status),
        )
        .route(
            paths::appointments::BY_ID,
            delete(appointments::cancel_appointment),
        )
}

/// Create payment routes
pub fn payment_routes() -> Router<CareBookServer> {
    Router::new()
        .route(
            paths::payments::CREATE_INTENT,
            post(payments::create_payment_intent),
        )
        .route(paths::payments::CONFIRM, post(payments::confirm_payment))
}

/// Merge all route groups into the application router.
pub fn create_routes() -> Router<CareBookServer> {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(doctor_routes())
        .merge(appointment_routes())
        .merge(payment_routes())
}
