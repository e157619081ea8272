//! Unit tests for the send rate limiter

use chrono::Duration;
use std::sync::Arc;

use crate::services::otp::{keys, ManualClock, RateLimiter};

use super::mocks::{fixed_start, MockStore};

const ID: &str = "+254700000000";

fn setup(window: u64) -> (Arc<ManualClock>, Arc<MockStore>, RateLimiter<MockStore>) {
    let clock = Arc::new(ManualClock::new(fixed_start()));
    let store = Arc::new(MockStore::new(clock.clone()));
    let limiter = RateLimiter::new(store.clone(), clock.clone(), window);
    (clock, store, limiter)
}

#[tokio::test]
async fn test_mark_then_limited_until_window_closes() {
    let (clock, _store, limiter) = setup(60);

    assert!(!limiter.is_limited(ID).await.unwrap());
    limiter.mark_limited(ID).await.unwrap();
    assert!(limiter.is_limited(ID).await.unwrap());
    assert_eq!(limiter.retry_after(ID).await.unwrap(), Some(60));

    clock.advance(Duration::milliseconds(59_500));
    assert_eq!(limiter.retry_after(ID).await.unwrap(), Some(1));

    clock.advance(Duration::milliseconds(500));
    assert!(!limiter.is_limited(ID).await.unwrap());
}

#[tokio::test]
async fn test_try_acquire_is_exclusive() {
    let (_clock, _store, limiter) = setup(60);

    assert!(limiter.try_acquire(ID).await.unwrap());
    assert!(!limiter.try_acquire(ID).await.unwrap());
    assert!(limiter.try_acquire("+254711111111").await.unwrap());
}

#[tokio::test]
async fn test_try_acquire_overrides_stale_marker() {
    let (_clock, store, limiter) = setup(60);

    // Store still holds a marker whose recorded expiry is in the past
    let past = (fixed_start() - Duration::seconds(1)).timestamp_millis();
    store.insert_raw(&keys::rate_limit_key(ID), &past.to_string());

    assert!(!limiter.is_limited(ID).await.unwrap());
    assert!(limiter.try_acquire(ID).await.unwrap());
    assert!(limiter.is_limited(ID).await.unwrap());
}

#[tokio::test]
async fn test_unreadable_marker_reports_full_window() {
    let (_clock, store, limiter) = setup(45);
    store.insert_raw(&keys::rate_limit_key(ID), "garbage");
    assert_eq!(limiter.retry_after(ID).await.unwrap(), Some(45));
}

#[tokio::test]
async fn test_release_reopens_sends() {
    let (_clock, _store, limiter) = setup(60);
    assert!(limiter.try_acquire(ID).await.unwrap());
    limiter.release(ID).await.unwrap();
    assert!(limiter.try_acquire(ID).await.unwrap());
}

#[tokio::test]
async fn test_zero_window_never_limits() {
    let (_clock, store, limiter) = setup(0);
    limiter.mark_limited(ID).await.unwrap();
    assert!(limiter.try_acquire(ID).await.unwrap());
    assert!(limiter.try_acquire(ID).await.unwrap());
    assert!(!store.contains(&keys::rate_limit_key(ID)));
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let (_clock, store, limiter) = setup(60);
    store.set_failing(true);
    assert!(limiter.is_limited(ID).await.is_err());
    assert!(limiter.try_acquire(ID).await.is_err());
}
