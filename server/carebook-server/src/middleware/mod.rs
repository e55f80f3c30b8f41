//! Middleware modules for request processing

pub mod auth_context;

// Re-export for convenience
pub use auth_context::AuthContext;

use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS layer for the demo deployment.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
