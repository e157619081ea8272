//! # Infrastructure Layer
//!
//! Concrete collaborators for the OTP core:
//! - **Cache**: Redis-backed and in-memory implementations of `ExpiringStore`
//! - **SMS**: SMS gateway integrations (HTTP bulk-SMS gateway, mock)
//! - **Delivery**: queued, retrying `DeliveryDispatcher` on top of an SMS gateway

// Re-export core types for convenience
pub use mp_core::errors::*;

/// Cache module - Redis client and expiring store backends
pub mod cache;

/// SMS service module - External SMS providers
pub mod sms;

/// Delivery module - Background dispatch of codes to SMS
pub mod delivery;

pub use cache::{build_store, StoreBackend};
pub use delivery::{DeliveryPolicy, QueuedDeliveryDispatcher};
pub use sms::{create_sms_service, SmsService};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}

impl From<InfrastructureError> for StoreError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e) if e.is_io_error() || e.is_connection_refusal() => {
                StoreError::Unavailable(e.to_string())
            }
            other => StoreError::Command(other.to_string()),
        }
    }
}
