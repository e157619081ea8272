//! One-time password configuration module

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of digits in a code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default code lifetime (5 minutes)
pub const DEFAULT_CODE_TTL_SECONDS: u64 = 300;

/// Default minimum interval between two sends for the same identifier
pub const DEFAULT_RATE_LIMIT_SECONDS: u64 = 60;

/// Default failed verification ceiling
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Longest accepted code lifetime (one day)
pub const MAX_CODE_TTL_SECONDS: u64 = 86_400;

/// Longest accepted send window (one day)
pub const MAX_RATE_LIMIT_SECONDS: u64 = 86_400;

/// Which identifiers the OTP service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierPolicy {
    /// E.164 or Kenyan national mobile numbers, normalized to E.164
    #[default]
    PhoneNumber,
    /// Any trimmed, non-empty string
    AnyNonEmpty,
}

impl std::str::FromStr for IdentifierPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "phone" | "phone_number" => Ok(IdentifierPolicy::PhoneNumber),
            "any" | "any_non_empty" => Ok(IdentifierPolicy::AnyNonEmpty),
            _ => Err(format!("Invalid identifier policy: {}", s)),
        }
    }
}

/// OTP issuance and verification settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Number of digits in a generated code
    pub code_length: usize,

    /// Seconds a code stays valid after issuance
    pub code_ttl_seconds: u64,

    /// Seconds an identifier must wait between two sends
    pub rate_limit_seconds: u64,

    /// Failed verifications allowed before the code is revoked
    pub max_attempts: u32,

    /// Identifier acceptance policy
    pub identifier_policy: IdentifierPolicy,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            code_ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
            rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            identifier_policy: IdentifierPolicy::default(),
        }
    }
}

/// Rejected OTP configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpConfigError {
    #[error("code_length must be between 4 and 9, got {0}")]
    CodeLength(usize),

    #[error("code_ttl_seconds must be greater than zero")]
    ZeroTtl,

    #[error("code_ttl_seconds must be at most 86400, got {0}")]
    TtlTooLong(u64),

    #[error("rate_limit_seconds must be at most 86400, got {0}")]
    RateLimitTooLong(u64),

    #[error("max_attempts must be greater than zero")]
    ZeroAttempts,
}

impl OtpConfig {
    /// Create from environment variables, keeping defaults for anything unset
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_length: env_or("OTP_CODE_LENGTH", defaults.code_length),
            code_ttl_seconds: env_or("OTP_CODE_TTL_SECONDS", defaults.code_ttl_seconds),
            rate_limit_seconds: env_or("OTP_RATE_LIMIT_SECONDS", defaults.rate_limit_seconds),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts),
            identifier_policy: env_or("OTP_IDENTIFIER_POLICY", defaults.identifier_policy),
        }
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), OtpConfigError> {
        // 10^code_length must fit in a u32
        if !(4..=9).contains(&self.code_length) {
            return Err(OtpConfigError::CodeLength(self.code_length));
        }
        if self.code_ttl_seconds == 0 {
            return Err(OtpConfigError::ZeroTtl);
        }
        if self.code_ttl_seconds > MAX_CODE_TTL_SECONDS {
            return Err(OtpConfigError::TtlTooLong(self.code_ttl_seconds));
        }
        if self.rate_limit_seconds > MAX_RATE_LIMIT_SECONDS {
            return Err(OtpConfigError::RateLimitTooLong(self.rate_limit_seconds));
        }
        if self.max_attempts == 0 {
            return Err(OtpConfigError::ZeroAttempts);
        }
        Ok(())
    }

    /// Code lifetime in whole minutes, rounded up (used in SMS copy)
    pub fn code_ttl_minutes(&self) -> u64 {
        self.code_ttl_seconds.div_ceil(60)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
