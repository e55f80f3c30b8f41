//! Common error handling utilities for CareBook Engine
//!
//! Provides the shared error taxonomy used across all CareBook crates,
//! the mapping from error codes to HTTP status codes, and the wire-level
//! error payload returned to API callers. Every domain error is recovered
//! at the request boundary and translated into a structured response;
//! infrastructure failures are logged and surfaced as a generic message.

pub mod codes;
pub mod response;

pub use codes::*;
pub use response::*;
