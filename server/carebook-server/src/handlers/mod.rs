//! HTTP request handlers

pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod health;
pub mod payments;
