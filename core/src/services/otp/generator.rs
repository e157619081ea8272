//! Numeric code generation

use chrono::{DateTime, Utc};

use mp_shared::config::otp::MAX_CODE_TTL_SECONDS;
use rand::{rngs::OsRng, Rng};

use crate::domain::OtpRecord;

use super::config::bounded_seconds;

/// Produces fresh OTP records from a CSPRNG
#[derive(Debug, Clone)]
pub struct OtpGenerator {
    code_length: usize,
    ttl_seconds: u64,
}

impl OtpGenerator {
    /// `code_length` is clamped to 1..=9 so that 10^length fits in a u32;
    /// `ttl_seconds` to one day
    pub fn new(code_length: usize, ttl_seconds: u64) -> Self {
        Self {
            code_length: code_length.clamp(1, 9),
            ttl_seconds: ttl_seconds.min(MAX_CODE_TTL_SECONDS),
        }
    }

    /// Build a record for `identifier` issued at `now`
    pub fn generate(&self, identifier: &str, now: DateTime<Utc>) -> OtpRecord {
        OtpRecord::new(
            identifier,
            self.generate_code(),
            now,
            bounded_seconds(self.ttl_seconds, MAX_CODE_TTL_SECONDS),
        )
    }

    /// Uniformly random code in [0, 10^length), left-padded with zeros
    pub fn generate_code(&self) -> String {
        let upper = 10u32.pow(self.code_length as u32);
        let value = OsRng.gen_range(0..upper);
        format!("{:0width$}", value, width = self.code_length)
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }
}
