//! Outstanding one-time password challenge for a single identifier.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One live OTP challenge, as held in the expiring store under `otp:code:<identifier>`
///
/// At most one record exists per identifier; issuing a new code overwrites
/// the previous one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Normalized subject the code was issued for
    pub identifier: String,

    /// Fixed-width, zero-padded numeric code
    pub token: String,

    /// When the code was issued
    pub issued_at: DateTime<Utc>,

    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a record issued at `issued_at` that lives for `ttl`
    pub fn new(
        identifier: impl Into<String>,
        token: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            token: token.into(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// Checks expiry against the given instant
    ///
    /// A record is expired from `expires_at` onwards, independently of whether
    /// the store has evicted it yet.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whole seconds left before expiry, rounded up; zero once expired
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.expires_at - now).num_milliseconds();
        if millis <= 0 {
            0
        } else {
            ((millis + 999) / 1000) as u64
        }
    }

    /// Compares a candidate code against the token in constant time
    pub fn matches(&self, candidate: &str) -> bool {
        if self.token.len() != candidate.len() {
            return false;
        }
        constant_time_eq(self.token.as_bytes(), candidate.as_bytes())
    }

    /// Serializes the record for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a stored record
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

// The token never goes into logs.
impl fmt::Debug for OtpRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpRecord")
            .field("identifier", &self.identifier)
            .field("token", &"[redacted]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
