//! Unit tests for the failed-attempt counter

use chrono::Duration;
use std::sync::Arc;

use crate::errors::StoreError;
use crate::services::otp::{keys, AttemptCounter, ManualClock};

use super::mocks::{fixed_start, MockStore};

const ID: &str = "+254700000000";

fn setup() -> (Arc<ManualClock>, Arc<MockStore>, AttemptCounter<MockStore>) {
    let clock = Arc::new(ManualClock::new(fixed_start()));
    let store = Arc::new(MockStore::new(clock.clone()));
    let counter = AttemptCounter::new(store.clone(), 5, 300);
    (clock, store, counter)
}

#[tokio::test]
async fn test_count_starts_at_zero() {
    let (_clock, _store, counter) = setup();
    assert_eq!(counter.count(ID).await.unwrap(), 0);
    assert_eq!(counter.remaining(0), 5);
}

#[tokio::test]
async fn test_record_failure_accumulates() {
    let (_clock, _store, counter) = setup();
    for expected in 1..=5 {
        assert_eq!(counter.record_failure(ID).await.unwrap(), expected);
    }
    assert_eq!(counter.count(ID).await.unwrap(), 5);
    assert!(counter.is_exhausted(5));
    assert_eq!(counter.remaining(5), 0);
    assert_eq!(counter.remaining(7), 0);
}

#[tokio::test]
async fn test_reset_clears_counter() {
    let (_clock, store, counter) = setup();
    counter.record_failure(ID).await.unwrap();
    counter.reset(ID).await.unwrap();
    assert!(!store.contains(&keys::attempts_key(ID)));
    assert_eq!(counter.count(ID).await.unwrap(), 0);
}

#[tokio::test]
async fn test_counter_expires_with_code_ttl() {
    let (clock, _store, counter) = setup();
    counter.record_failure(ID).await.unwrap();
    clock.advance(Duration::seconds(300));
    assert_eq!(counter.count(ID).await.unwrap(), 0);
}

#[tokio::test]
async fn test_corrupt_counter_is_an_error() {
    let (_clock, store, counter) = setup();
    store.insert_raw(&keys::attempts_key(ID), "many");
    assert!(matches!(
        counter.count(ID).await,
        Err(StoreError::InvalidValue { .. })
    ));
}
