//! Identity management for CareBook Engine
//!
//! Provides user accounts for patients and doctors, argon2 password
//! hashing, JWT credential issuance and verification, and the public
//! doctor directory. Authentication only lives here; authorization
//! (who may do what to which appointment) belongs to the booking
//! workflows.

pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod tokens;

pub use config::*;
pub use directory::*;
pub use error::*;
pub use models::*;
pub use repository::*;
pub use service::*;
pub use tokens::*;
