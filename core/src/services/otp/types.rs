//! Result types for the OTP service

use chrono::{DateTime, Utc};

use crate::domain::OtpRecord;

/// Outcome of a successful send
#[derive(Debug, Clone)]
pub struct SendOtpResult {
    /// The stored challenge; its token is what was handed to delivery
    pub record: OtpRecord,
    /// Earliest moment another send for this identifier will be accepted
    pub next_resend_at: DateTime<Utc>,
    /// Whether the delivery job was queued
    pub dispatched: bool,
}

impl SendOtpResult {
    pub fn identifier(&self) -> &str {
        &self.record.identifier
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.record.expires_at
    }

    /// Seconds of validity left as seen from `now`
    pub fn expires_in_seconds(&self, now: DateTime<Utc>) -> u64 {
        self.record.remaining_seconds_at(now)
    }
}
