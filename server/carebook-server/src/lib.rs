//! CareBook Server - appointment booking platform API
//!
//! This library provides the core functionality of the CareBook HTTP server,
//! including authentication, appointment booking, and payment endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod validation;

// Re-export commonly used types
pub use error::ApiError;
pub use server::{CareBookServer, ServerConfig};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: CareBookServer) -> Router {
    routes::create_routes()
        .merge(openapi::create_docs_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer()),
        )
        .with_state(server)
}
