//! Integration tests for the OTP service on a live Redis server
//!
//! Run with `REDIS_URL` pointing at a disposable instance and `--ignored`.

use std::sync::Arc;

use mp_core::errors::OtpError;
use mp_core::services::{OtpService, OtpServiceConfig};
use mp_infra::cache::RedisStore;
use mp_infra::delivery::QueuedDeliveryDispatcher;
use mp_infra::sms::MockSmsService;
use mp_shared::{CacheConfig, DeliveryConfig};

async fn service() -> OtpService<RedisStore, QueuedDeliveryDispatcher> {
    let config = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .with_prefix(format!("mp_it_{}", uuid::Uuid::new_v4()));
    let store = RedisStore::connect(config).await.expect("redis reachable");
    let (dispatcher, _worker) = QueuedDeliveryDispatcher::from_config(
        Arc::new(MockSmsService::silent()),
        &DeliveryConfig::default(),
        5,
    );
    OtpService::new(Arc::new(store), Arc::new(dispatcher), OtpServiceConfig::default())
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_send_verify_on_redis() {
    let service = service().await;
    let phone = "+254700000001";

    let sent = service.send(phone).await.unwrap();
    let remaining = service.remaining_time(phone).await.unwrap();
    assert!(remaining > 0 && remaining <= 300);

    assert!(matches!(
        service.send(phone).await,
        Err(OtpError::RateLimited { retry_after_seconds }) if retry_after_seconds <= 60
    ));

    assert!(service.verify(phone, &sent.record.token).await.is_ok());
    assert_eq!(
        service.verify(phone, &sent.record.token).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_attempt_ceiling_on_redis() {
    let service = service().await;
    let phone = "+254700000002";

    let sent = service.send(phone).await.unwrap();
    let wrong = if sent.record.token == "000000" { "111111" } else { "000000" };

    for _ in 0..4 {
        let _ = service.verify(phone, wrong).await;
    }
    assert_eq!(service.verify(phone, wrong).await, Err(OtpError::AttemptsExceeded));
    assert_eq!(
        service.verify(phone, &sent.record.token).await,
        Err(OtpError::OtpExpiredOrMissing)
    );
}
