//! # Member Portal Core
//!
//! Core business logic for one-time password (OTP) issuance and verification.
//! This crate contains the OTP domain entity, the error taxonomy surfaced to
//! callers, the seams to the expiring store and delivery dispatcher, and the
//! services built on them: code generator, rate limiter, attempt counter and
//! the lifecycle manager that orchestrates them.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
