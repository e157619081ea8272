//! Configuration for the OTP service

use chrono::Duration;

use mp_shared::config::otp::{
    DEFAULT_CODE_LENGTH, DEFAULT_CODE_TTL_SECONDS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RATE_LIMIT_SECONDS, MAX_CODE_TTL_SECONDS, MAX_RATE_LIMIT_SECONDS,
};
use mp_shared::{IdentifierPolicy, OtpConfig};

/// Configuration for the OTP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpServiceConfig {
    /// Digits per generated code
    pub code_length: usize,
    /// Seconds a code stays valid
    pub code_ttl_seconds: u64,
    /// Minimum seconds between two sends to one identifier; zero disables throttling
    pub rate_limit_seconds: u64,
    /// Failed verifications allowed per code
    pub max_attempts: u32,
    /// Which identifiers are accepted and how they are normalized
    pub identifier_policy: IdentifierPolicy,
}

impl Default for OtpServiceConfig {
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

impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_length: config.code_length,
            code_ttl_seconds: config.code_ttl_seconds,
            rate_limit_seconds: config.rate_limit_seconds,
            max_attempts: config.max_attempts,
            identifier_policy: config.identifier_policy,
        }
    }
}

impl OtpServiceConfig {
    /// Copy with the lifetimes clamped to what `OtpConfig::validate` accepts
    pub fn bounded(&self) -> Self {
        Self {
            code_ttl_seconds: self.code_ttl_seconds.min(MAX_CODE_TTL_SECONDS),
            rate_limit_seconds: self.rate_limit_seconds.min(MAX_RATE_LIMIT_SECONDS),
            ..self.clone()
        }
    }
}

/// `seconds` capped at `max`, as a chrono duration
pub(crate) fn bounded_seconds(seconds: u64, max: u64) -> Duration {
    Duration::seconds(i64::try_from(seconds.min(max)).unwrap_or(i64::MAX))
}
