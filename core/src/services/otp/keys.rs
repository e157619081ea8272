//! Store key layout
//!
//! Every key is `otp:<kind>:<identifier>`. The kind segment never varies
//! with input, so keys of different kinds cannot collide whatever the
//! identifier contains.

/// Key of the live [`OtpRecord`](crate::domain::OtpRecord)
pub fn record_key(identifier: &str) -> String {
    format!("otp:code:{}", identifier)
}

/// Key of the send throttle marker
pub fn rate_limit_key(identifier: &str) -> String {
    format!("otp:rate_limit:{}", identifier)
}

/// Key of the failed-verification counter
pub fn attempts_key(identifier: &str) -> String {
    format!("otp:attempts:{}", identifier)
}
