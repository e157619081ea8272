//! Domain-specific error types and error handling.

mod types;


// Re-export collaborator error types
pub use types::{DispatchError, StoreError};

use mp_shared::errors::{error_codes, ErrorResponse};
use thiserror::Error;

/// Outcomes of OTP operations that callers must be able to tell apart
///
/// Every variant except `StoreUnavailable` is an expected business outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid identifier: {reason}")]
    InvalidIdentifier { reason: String },

    #[error("Please wait {retry_after_seconds} seconds before requesting a new code")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Verification code expired or not found. Please request a new code")]
    OtpExpiredOrMissing,

    #[error("Maximum verification attempts exceeded. Please request a new code")]
    AttemptsExceeded,

    #[error("Invalid verification code. {remaining_attempts} attempts remaining")]
    InvalidOtp { remaining_attempts: u32 },

    #[error("OTP store unavailable: {message}")]
    StoreUnavailable { message: String },
}

pub type OtpResult<T> = Result<T, OtpError>;

impl OtpError {
    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpError::InvalidIdentifier { .. } => error_codes::INVALID_IDENTIFIER,
            OtpError::RateLimited { .. } => error_codes::RATE_LIMITED,
            OtpError::OtpExpiredOrMissing => error_codes::OTP_EXPIRED_OR_MISSING,
            OtpError::AttemptsExceeded => error_codes::ATTEMPTS_EXCEEDED,
            OtpError::InvalidOtp { .. } => error_codes::INVALID_OTP,
            OtpError::StoreUnavailable { .. } => error_codes::STORE_UNAVAILABLE,
        }
    }

    /// Whether the failure is infrastructure rather than a business outcome
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, OtpError::StoreUnavailable { .. })
    }
}

impl From<StoreError> for OtpError {
    fn from(err: StoreError) -> Self {
        OtpError::StoreUnavailable {
            message: err.to_string(),
        }
    }
}

/// Convert OtpError to ErrorResponse
impl From<&OtpError> for ErrorResponse {
    fn from(err: &OtpError) -> Self {
        let response = match err {
            // Store details stay in the logs
            OtpError::StoreUnavailable { .. } => ErrorResponse::new(
                err.error_code(),
                "Verification service temporarily unavailable",
            ),
            _ => ErrorResponse::new(err.error_code(), err.to_string()),
        };

        match err {
            OtpError::RateLimited { retry_after_seconds } => {
                response.add_detail("retry_after_seconds", retry_after_seconds)
            }
            OtpError::InvalidOtp { remaining_attempts } => {
                response.add_detail("remaining_attempts", remaining_attempts)
            }
            _ => response,
        }
    }
}
