//! End-to-end HTTP tests over the in-memory server.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use carebook_server::{create_app, CareBookServer, ServerConfig};

async fn app() -> Router {
    let server = CareBookServer::new_in_memory(ServerConfig::default())
        .await
        .expect("server init");
    create_app(server)
}

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Register an account and return (token, user id).
async fn register(app: &Router, email: &str, role: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "firstName": "Test",
            "lastName": "User",
            "email": email,
            "password": "SecureP@ssw0rd",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let token = body["token"].as_str().expect("token").to_string();
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();
    (token, user_id)
}

async fn book(app: &Router, patient_token: &str, doctor_id: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/appointments",
        Some(patient_token),
        Some(json!({
            "doctorId": doctor_id,
            "appointmentDate": "2026-09-01T10:00:00Z",
            "appointmentType": "in-person",
            "consultationFee": 150,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "booking failed: {body}");
    body["id"].as_str().expect("appointment id").to_string()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_and_login_round_trip() {
    let app = app().await;
    let (_, user_id) = register(&app, "jane@example.com", "patient").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({
            "email": "jane@example.com",
            "password": "SecureP@ssw0rd",
            "role": "patient",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged in successfully");
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app().await;
    register(&app, "dup@example.com", "patient").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "firstName": "Test",
            "lastName": "User",
            "email": "dup@example.com",
            "password": "SecureP@ssw0rd",
            "role": "patient",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_fails_unauthorized() {
    let app = app().await;
    register(&app, "jane@example.com", "patient").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({
            "email": "jane@example.com",
            "password": "not-the-password",
            "role": "patient",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = app().await;
    let (status, body) =
        send(&app, Method::GET, "/api/appointments/patient", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token, authorization denied");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/appointments/patient",
        Some("not.a.jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn doctor_cannot_book_appointments() {
    let app = app().await;
    let (doctor_token, doctor_id) = register(&app, "doc@example.com", "doctor").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/appointments",
        Some(&doctor_token),
        Some(json!({
            "doctorId": doctor_id,
            "appointmentDate": "2026-09-01T10:00:00Z",
            "appointmentType": "virtual",
            "consultationFee": 150,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only patients can book appointments");
}

#[tokio::test]
async fn doctor_directory_is_seeded_and_filterable() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/doctors", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/doctors?specialty=cardiology",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let doctors = body.as_array().expect("array");
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["lastName"], "Johnson");

    let id = doctors[0]["id"].as_str().expect("doctor id");
    let (status, body) =
        send(&app, Method::GET, &format!("/api/doctors/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["specialty"], "Cardiology");
}

#[tokio::test]
async fn registered_doctor_appears_in_the_directory() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "firstName": "Maya",
            "lastName": "Okafor",
            "email": "maya@example.com",
            "password": "SecureP@ssw0rd",
            "role": "doctor",
            "specialty": "Neurology",
            "consultationFee": 180,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/doctors?specialty=neurology",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let doctors = body.as_array().expect("array");
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["id"], user_id.as_str());
    assert_eq!(doctors[0]["lastName"], "Okafor");
}

#[tokio::test]
async fn doctor_manages_own_profile_and_schedule() {
    let app = app().await;
    let (doctor_token, doctor_id) = register(&app, "doc@example.com", "doctor").await;

    // Fresh profile has no working days yet.
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/doctors/{doctor_id}/availability?date=2026-09-07"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/doctors/{doctor_id}/schedule"),
        Some(&doctor_token),
        Some(json!({
            "availableDays": ["Monday", "Wednesday"],
            "workingHours": "09:00 AM - 05:00 PM",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "schedule update failed: {body}");
    assert_eq!(body["workingHours"], "09:00 AM - 05:00 PM");

    // 2026-09-07 is a Monday.
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/doctors/{doctor_id}/availability?date=2026-09-07"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
    assert_eq!(body["slots"].as_array().map(Vec::len), Some(7));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/doctors/{doctor_id}"),
        Some(&doctor_token),
        Some(json!({
            "bio": "Neurologist focused on preventive care",
            "location": "Chicago, IL",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "profile update failed: {body}");
    assert_eq!(body["bio"], "Neurologist focused on preventive care");
    assert_eq!(body["location"], "Chicago, IL");
}

#[tokio::test]
async fn doctor_profile_updates_are_owner_only() {
    let app = app().await;
    let (_, doctor_id) = register(&app, "doc@example.com", "doctor").await;
    let (other_doctor_token, _) = register(&app, "other-doc@example.com", "doctor").await;
    let (patient_token, _) = register(&app, "pat@example.com", "patient").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/doctors/{doctor_id}"),
        Some(&other_doctor_token),
        Some(json!({ "bio": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/doctors/{doctor_id}/schedule"),
        Some(&patient_token),
        Some(json!({ "availableDays": ["Sunday"] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, &format!("/api/doctors/{doctor_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "");
}

#[tokio::test]
async fn full_booking_and_payment_flow() {
    let app = app().await;
    let (patient_token, _) = register(&app, "pat@example.com", "patient").await;
    let (doctor_token, doctor_id) = register(&app, "doc@example.com", "doctor").await;

    let appointment_id = book(&app, &patient_token, &doctor_id).await;

    // New bookings are pending/pending and visible to both parties.
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/appointments/patient",
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "pending");
    assert_eq!(body[0]["paymentStatus"], "pending");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/appointments/doctor",
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], appointment_id.as_str());

    // Patient mints an intent and confirms the payment.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/payments/create-payment-intent",
        Some(&patient_token),
        Some(json!({ "appointmentId": appointment_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "intent failed: {body}");
    let client_secret = body["clientSecret"].as_str().expect("client secret");
    let intent_id = client_secret
        .split("_secret_")
        .next()
        .expect("intent id")
        .to_string();
    assert!(intent_id.starts_with("pi_"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/payments/confirm",
        Some(&patient_token),
        Some(json!({
            "appointmentId": appointment_id,
            "paymentIntentId": intent_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "confirm failed: {body}");
    assert_eq!(body["message"], "Payment confirmed successfully");
    assert_eq!(body["appointment"]["status"], "confirmed");
    assert_eq!(body["appointment"]["paymentStatus"], "completed");

    // A second intent against the paid appointment is refused.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/payments/create-payment-intent",
        Some(&patient_token),
        Some(json!({ "appointmentId": appointment_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Payment already completed");

    // Doctor closes out the visit.
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/appointments/{appointment_id}/status"),
        Some(&doctor_token),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn skipping_confirmation_is_a_conflict() {
    let app = app().await;
    let (patient_token, _) = register(&app, "pat@example.com", "patient").await;
    let (doctor_token, doctor_id) = register(&app, "doc@example.com", "doctor").await;
    let appointment_id = book(&app, &patient_token, &doctor_id).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/appointments/{appointment_id}/status"),
        Some(&doctor_token),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn only_the_parties_may_cancel() {
    let app = app().await;
    let (patient_token, _) = register(&app, "pat@example.com", "patient").await;
    let (_, doctor_id) = register(&app, "doc@example.com", "doctor").await;
    let (stranger_token, _) = register(&app, "other@example.com", "patient").await;
    let appointment_id = book(&app, &patient_token, &doctor_id).await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/appointments/{appointment_id}"),
        Some(&stranger_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/appointments/{appointment_id}"),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Appointment cancelled successfully");

    // Cancelling again is a no-op, not an error.
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/appointments/{appointment_id}"),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cancelled_appointment_cannot_be_paid() {
    let app = app().await;
    let (patient_token, _) = register(&app, "pat@example.com", "patient").await;
    let (_, doctor_id) = register(&app, "doc@example.com", "doctor").await;
    let appointment_id = book(&app, &patient_token, &doctor_id).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/payments/create-payment-intent",
        Some(&patient_token),
        Some(json!({ "appointmentId": appointment_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "intent failed: {body}");
    let intent_id = body["clientSecret"]
        .as_str()
        .expect("client secret")
        .split("_secret_")
        .next()
        .expect("intent id")
        .to_string();

    send(
        &app,
        Method::DELETE,
        &format!("/api/appointments/{appointment_id}"),
        Some(&patient_token),
        None,
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/payments/confirm",
        Some(&patient_token),
        Some(json!({
            "appointmentId": appointment_id,
            "paymentIntentId": intent_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
