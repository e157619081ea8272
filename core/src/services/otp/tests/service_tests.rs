//! Unit tests for the OTP lifecycle manager

use chrono::Duration;
use std::sync::Arc;

use mp_shared::IdentifierPolicy;

use crate::domain::OtpRecord;
use crate::errors::OtpError;
use crate::services::otp::{keys, ManualClock, OtpService, OtpServiceConfig};

use super::mocks::{fixed_start, MockDispatcher, MockStore};

const PHONE: &str = "+254700000000";

struct Harness {
    clock: Arc<ManualClock>,
    store: Arc<MockStore>,
    dispatcher: Arc<MockDispatcher>,
    service: OtpService<MockStore, MockDispatcher>,
}

fn harness_with(config: OtpServiceConfig, failing_dispatch: bool) -> Harness {
    let clock = Arc::new(ManualClock::new(fixed_start()));
    let store = Arc::new(MockStore::new(clock.clone()));
    let dispatcher = Arc::new(MockDispatcher::new(failing_dispatch));
    let service =
        OtpService::with_clock(store.clone(), dispatcher.clone(), clock.clone(), config);
    Harness {
        clock,
        store,
        dispatcher,
        service,
    }
}

fn harness() -> Harness {
    harness_with(OtpServiceConfig::default(), false)
}

fn wrong_code(correct: &str) -> String {
    if correct == "000000" {
        "111111".to_string()
    } else {
        "000000".to_string()
    }
}

#[tokio::test]
async fn test_send_stores_and_dispatches_code() {
    let h = harness();

    let result = h.service.send(PHONE).await.unwrap();

    assert_eq!(result.identifier(), PHONE);
    assert_eq!(result.record.token.len(), 6);
    assert!(result.record.token.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(result.expires_at(), fixed_start() + Duration::seconds(300));
    assert_eq!(result.next_resend_at, fixed_start() + Duration::seconds(60));
    assert!(result.dispatched);
    assert_eq!(h.dispatcher.last_code_for(PHONE), Some(result.record.token.clone()));

    let stored = h.store.raw(&keys::record_key(PHONE)).unwrap();
    assert_eq!(OtpRecord::from_json(&stored).unwrap(), result.record);
}

#[tokio::test]
async fn test_send_normalizes_identifier() {
    let h = harness();
    let result = h.service.send("0712 345 678").await.unwrap();
    assert_eq!(result.identifier(), "+254712345678");
    assert!(h.service.remaining_time("+254712345678").await.is_ok());
}

#[tokio::test]
async fn test_send_rejects_invalid_identifier_without_touching_store() {
    let h = harness();
    h.store.set_failing(true);

    for raw in ["", "not-a-phone"] {
        let err = h.service.send(raw).await.unwrap_err();
        assert!(matches!(err, OtpError::InvalidIdentifier { .. }));
    }
    assert_eq!(h.dispatcher.sent_count(), 0);
}

#[tokio::test]
async fn test_second_send_within_window_is_rate_limited() {
    let h = harness();
    h.service.send(PHONE).await.unwrap();

    h.clock.advance(Duration::seconds(20));
    let err = h.service.send(PHONE).await.unwrap_err();
    assert_eq!(err, OtpError::RateLimited { retry_after_seconds: 40 });
    assert_eq!(h.dispatcher.sent_count(), 1);
}

#[tokio::test]
async fn test_send_after_window_replaces_code() {
    let h = harness();
    let first = h.service.send(PHONE).await.unwrap();

    h.clock.advance(Duration::seconds(60));
    let second = h.service.send(PHONE).await.unwrap();

    let stored = OtpRecord::from_json(&h.store.raw(&keys::record_key(PHONE)).unwrap()).unwrap();
    assert_eq!(stored, second.record);
    assert_eq!(stored.issued_at, first.record.issued_at + Duration::seconds(60));
}

#[tokio::test]
async fn test_verify_succeeds_exactly_once() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();

    assert_eq!(h.service.verify(PHONE, &sent.record.token).await, Ok(()));
    assert_eq!(
        h.service.verify(PHONE, &sent.record.token).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
    assert!(!h.store.contains(&keys::record_key(PHONE)));
    assert!(!h.store.contains(&keys::attempts_key(PHONE)));
}

#[tokio::test]
async fn test_verify_accepts_equivalent_identifier_forms() {
    let h = harness();
    let sent = h.service.send("0712345678").await.unwrap();
    assert!(h.service.verify("+254712345678", &sent.record.token).await.is_ok());
}

#[tokio::test]
async fn test_verify_without_send_is_missing() {
    let h = harness();
    assert_eq!(
        h.service.verify(PHONE, "123456").await,
        Err(OtpError::OtpExpiredOrMissing)
    );
}

#[tokio::test]
async fn test_wrong_code_reports_remaining_attempts() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();
    let wrong = wrong_code(&sent.record.token);

    for remaining in (1..=4).rev() {
        assert_eq!(
            h.service.verify(PHONE, &wrong).await,
            Err(OtpError::InvalidOtp { remaining_attempts: remaining })
        );
        assert_eq!(h.service.remaining_attempts(PHONE).await.unwrap(), remaining);
    }

    // Correct code still works before the ceiling is reached
    assert!(h.service.verify(PHONE, &sent.record.token).await.is_ok());
}

#[tokio::test]
async fn test_fifth_wrong_code_locks_out() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();
    let wrong = wrong_code(&sent.record.token);

    for _ in 0..4 {
        assert!(matches!(
            h.service.verify(PHONE, &wrong).await,
            Err(OtpError::InvalidOtp { .. })
        ));
    }
    assert_eq!(
        h.service.verify(PHONE, &wrong).await,
        Err(OtpError::AttemptsExceeded)
    );

    // Record and counter are gone, so even the right code fails
    assert!(!h.store.contains(&keys::record_key(PHONE)));
    assert!(!h.store.contains(&keys::attempts_key(PHONE)));
    assert_eq!(
        h.service.verify(PHONE, &sent.record.token).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
}

#[tokio::test]
async fn test_exhausted_counter_revokes_before_comparing() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();
    h.store.insert_raw(&keys::attempts_key(PHONE), "5");

    assert_eq!(
        h.service.verify(PHONE, &sent.record.token).await,
        Err(OtpError::AttemptsExceeded)
    );
    assert!(!h.store.contains(&keys::record_key(PHONE)));
}

#[tokio::test]
async fn test_malformed_candidate_counts_as_failure() {
    let h = harness();
    h.service.send(PHONE).await.unwrap();

    assert_eq!(
        h.service.verify(PHONE, "12ab").await,
        Err(OtpError::InvalidOtp { remaining_attempts: 4 })
    );
    assert_eq!(
        h.service.verify(PHONE, "").await,
        Err(OtpError::InvalidOtp { remaining_attempts: 3 })
    );
}

#[tokio::test]
async fn test_resend_after_lockout_resets_attempts() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();
    let wrong = wrong_code(&sent.record.token);
    for _ in 0..5 {
        let _ = h.service.verify(PHONE, &wrong).await;
    }

    h.clock.advance(Duration::seconds(60));
    let fresh = h.service.send(PHONE).await.unwrap();

    assert_eq!(h.service.remaining_attempts(PHONE).await.unwrap(), 5);
    assert!(h.service.verify(PHONE, &fresh.record.token).await.is_ok());
}

#[tokio::test]
async fn test_resend_clears_earlier_failures() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();
    let wrong = wrong_code(&sent.record.token);
    for _ in 0..3 {
        let _ = h.service.verify(PHONE, &wrong).await;
    }

    h.clock.advance(Duration::seconds(61));
    h.service.send(PHONE).await.unwrap();
    assert_eq!(h.service.remaining_attempts(PHONE).await.unwrap(), 5);
}

#[tokio::test]
async fn test_remaining_time_right_after_send() {
    let h = harness();
    h.service.send(PHONE).await.unwrap();

    let remaining = h.service.remaining_time(PHONE).await.unwrap();
    assert!(remaining > 0 && remaining <= 300);
    assert_eq!(remaining, 300);

    h.clock.advance(Duration::milliseconds(100_500));
    assert_eq!(h.service.remaining_time(PHONE).await.unwrap(), 200);
}

#[tokio::test]
async fn test_remaining_time_without_code() {
    let h = harness();
    assert_eq!(
        h.service.remaining_time(PHONE).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
}

#[tokio::test]
async fn test_expired_record_is_rejected_and_pruned() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();

    // Store lags behind: plant the record without a store TTL
    h.store
        .insert_raw(&keys::record_key(PHONE), &sent.record.to_json().unwrap());
    h.clock.advance(Duration::seconds(300));

    assert_eq!(
        h.service.verify(PHONE, &sent.record.token).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
    assert!(!h.store.contains(&keys::record_key(PHONE)));
}

#[tokio::test]
async fn test_remaining_time_prunes_expired_record() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();
    h.store
        .insert_raw(&keys::record_key(PHONE), &sent.record.to_json().unwrap());
    h.clock.advance(Duration::seconds(301));

    assert_eq!(
        h.service.remaining_time(PHONE).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
    assert!(!h.store.contains(&keys::record_key(PHONE)));
}

#[tokio::test]
async fn test_code_expiring_between_send_and_verify() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();
    h.clock.advance(Duration::seconds(299));
    assert_eq!(h.service.remaining_time(PHONE).await.unwrap(), 1);

    h.clock.advance(Duration::seconds(1));
    assert_eq!(
        h.service.verify(PHONE, &sent.record.token).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
}

#[tokio::test]
async fn test_corrupt_record_is_treated_as_missing() {
    let h = harness();
    h.store.insert_raw(&keys::record_key(PHONE), "{not json");
    h.store.insert_raw(&keys::attempts_key(PHONE), "2");

    assert_eq!(
        h.service.verify(PHONE, "123456").await,
        Err(OtpError::OtpExpiredOrMissing)
    );
    assert!(!h.store.contains(&keys::record_key(PHONE)));
    assert!(!h.store.contains(&keys::attempts_key(PHONE)));
}

#[tokio::test]
async fn test_dispatch_failure_keeps_code_valid() {
    let h = harness_with(OtpServiceConfig::default(), true);

    let sent = h.service.send(PHONE).await.unwrap();
    assert!(!sent.dispatched);
    assert!(h.store.contains(&keys::record_key(PHONE)));
    assert!(h.service.verify(PHONE, &sent.record.token).await.is_ok());
}

#[tokio::test]
async fn test_store_outage_surfaces_as_unavailable() {
    let h = harness();
    h.store.set_failing(true);

    assert!(matches!(
        h.service.send(PHONE).await,
        Err(OtpError::StoreUnavailable { .. })
    ));
    assert!(matches!(
        h.service.verify(PHONE, "123456").await,
        Err(OtpError::StoreUnavailable { .. })
    ));
    assert!(matches!(
        h.service.remaining_time(PHONE).await,
        Err(OtpError::StoreUnavailable { .. })
    ));
    assert_eq!(h.dispatcher.sent_count(), 0);
}

#[tokio::test]
async fn test_failed_counter_reset_rolls_back_send() {
    let h = harness();
    h.store.fail_deletes("otp:attempts:", 1);

    assert!(matches!(
        h.service.send(PHONE).await,
        Err(OtpError::StoreUnavailable { .. })
    ));
    assert!(!h.store.contains(&keys::record_key(PHONE)));
    assert!(!h.store.contains(&keys::rate_limit_key(PHONE)));
    assert_eq!(h.dispatcher.sent_count(), 0);

    // Store recovered: the caller is not held to the window
    let sent = h.service.send(PHONE).await.unwrap();
    assert!(sent.dispatched);
    assert!(h.service.verify(PHONE, &sent.record.token).await.is_ok());
}

#[tokio::test]
async fn test_oversized_lifetimes_are_capped() {
    let config = OtpServiceConfig {
        code_ttl_seconds: u64::MAX / 2,
        rate_limit_seconds: u64::MAX,
        ..Default::default()
    };
    let h = harness_with(config, false);

    let sent = h.service.send(PHONE).await.unwrap();

    assert_eq!(sent.expires_at(), fixed_start() + Duration::days(1));
    assert_eq!(sent.next_resend_at, fixed_start() + Duration::days(1));
    assert_eq!(h.service.config().code_ttl_seconds, 86_400);
    assert_eq!(h.service.remaining_time(PHONE).await.unwrap(), 86_400);
}

#[tokio::test]
async fn test_invalidate_revokes_code_but_keeps_window() {
    let h = harness();
    let sent = h.service.send(PHONE).await.unwrap();

    h.service.invalidate(PHONE).await.unwrap();

    assert_eq!(
        h.service.verify(PHONE, &sent.record.token).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
    assert!(matches!(
        h.service.send(PHONE).await,
        Err(OtpError::RateLimited { .. })
    ));
}

#[tokio::test]
async fn test_identifiers_are_independent() {
    let h = harness();
    let a = h.service.send(PHONE).await.unwrap();
    let b = h.service.send("+254711111111").await.unwrap();

    let wrong = wrong_code(&a.record.token);
    let _ = h.service.verify(PHONE, &wrong).await;

    assert_eq!(h.service.remaining_attempts("+254711111111").await.unwrap(), 5);
    assert!(h.service.verify("+254711111111", &b.record.token).await.is_ok());
    assert!(h.service.verify(PHONE, &a.record.token).await.is_ok());
}

#[tokio::test]
async fn test_any_identifier_policy_with_custom_limits() {
    let config = OtpServiceConfig {
        code_length: 4,
        code_ttl_seconds: 120,
        rate_limit_seconds: 0,
        max_attempts: 2,
        identifier_policy: IdentifierPolicy::AnyNonEmpty,
    };
    let h = harness_with(config, false);

    let first = h.service.send("user@example.com").await.unwrap();
    assert_eq!(first.record.token.len(), 4);

    // No throttle window configured
    let second = h.service.send("user@example.com").await.unwrap();
    let wrong = if second.record.token == "0000" { "1111" } else { "0000" };

    assert_eq!(
        h.service.verify("user@example.com", wrong).await,
        Err(OtpError::InvalidOtp { remaining_attempts: 1 })
    );
    assert_eq!(
        h.service.verify("user@example.com", wrong).await,
        Err(OtpError::AttemptsExceeded)
    );
}
