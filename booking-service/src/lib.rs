//! Booking Service for CareBook Engine
//!
//! Provides the appointment lifecycle and payment correlation core:
//! - Appointment records with an explicit status transition table
//! - Role- and ownership-checked booking workflow
//! - Payment intents correlated one-to-one with appointments
//! - Writer-serialized in-memory store behind repository traits

pub mod error;
pub mod models;
pub mod payment;
pub mod processor;
pub mod store;
pub mod workflow;

pub use error::*;
pub use models::*;
pub use payment::*;
pub use processor::*;
pub use store::*;
pub use workflow::*;
