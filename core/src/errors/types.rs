//! Error types raised by the OTP service's external collaborators

use thiserror::Error;

/// Failure of the expiring key-value store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Unavailable(String),

    #[error("store command failed: {0}")]
    Command(String),

    #[error("unexpected value under '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Failure to hand a code to the delivery queue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("delivery queue is full")]
    QueueFull,

    #[error("delivery queue is closed")]
    Closed,
}
