//! Unit tests for the OTP record entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::otp_record::OtpRecord;

fn issued() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_new_record_expiry() {
    let record = OtpRecord::new("+254700000000", "042917", issued(), Duration::seconds(300));

    assert_eq!(record.identifier, "+254700000000");
    assert_eq!(record.token, "042917");
    assert_eq!(record.expires_at, issued() + Duration::seconds(300));
}

#[test]
fn test_is_expired_at_boundary() {
    let record = OtpRecord::new("+254700000000", "042917", issued(), Duration::seconds(300));

    assert!(!record.is_expired_at(issued()));
    assert!(!record.is_expired_at(issued() + Duration::seconds(299)));
    assert!(record.is_expired_at(issued() + Duration::seconds(300)));
    assert!(record.is_expired_at(issued() + Duration::seconds(301)));
}

#[test]
fn test_remaining_seconds_rounds_up() {
    let record = OtpRecord::new("+254700000000", "042917", issued(), Duration::seconds(300));

    assert_eq!(record.remaining_seconds_at(issued()), 300);
    assert_eq!(record.remaining_seconds_at(issued() + Duration::milliseconds(299_500)), 1);
    assert_eq!(record.remaining_seconds_at(issued() + Duration::seconds(300)), 0);
    assert_eq!(record.remaining_seconds_at(issued() + Duration::seconds(900)), 0);
}

#[test]
fn test_matches() {
    let record = OtpRecord::new("+254700000000", "042917", issued(), Duration::seconds(300));

    assert!(record.matches("042917"));
    assert!(!record.matches("42917"));
    assert!(!record.matches("042918"));
    assert!(!record.matches(""));
}

#[test]
fn test_json_round_trip() {
    let record = OtpRecord::new("+254700000000", "000123", issued(), Duration::seconds(300));

    let json = record.to_json().unwrap();
    let parsed = OtpRecord::from_json(&json).unwrap();
    assert_eq!(parsed, record);
    assert!(OtpRecord::from_json("not json").is_err());
}

#[test]
fn test_debug_redacts_token() {
    let record = OtpRecord::new("+254700000000", "987654", issued(), Duration::seconds(300));

    let debug = format!("{:?}", record);
    assert!(!debug.contains("987654"));
    assert!(debug.contains("[redacted]"));
}
