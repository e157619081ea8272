//! One-time password service module
//!
//! This module provides the complete OTP workflow:
//! - Code generation (fixed-width numeric codes with an expiry)
//! - Per-identifier send throttling
//! - Failed-attempt counting with a lockout ceiling
//! - Lifecycle orchestration: send, verify, remaining time, invalidation
//!
//! All state lives in an injected [`ExpiringStore`]; the services hold
//! nothing between calls.

mod attempt_counter;
mod clock;
mod config;
mod generator;
mod identifier;
pub mod keys;
mod rate_limiter;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use attempt_counter::AttemptCounter;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OtpServiceConfig;
pub use generator::OtpGenerator;
pub use identifier::normalize_identifier;
pub use rate_limiter::RateLimiter;
pub use service::OtpService;
pub use traits::{DeliveryDispatcher, ExpiringStore};
pub use types::SendOtpResult;
