//! Traits for the expiring store and delivery dispatcher integrations

use async_trait::async_trait;

use crate::errors::{DispatchError, StoreError};

/// Key-value cache with per-key TTL, the single owner of all OTP state
///
/// Implementations must make `increment` and `set_if_absent` atomic; the
/// other operations are plain reads and writes. A TTL of zero means the key
/// never expires.
#[async_trait]
pub trait ExpiringStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value, for `ttl_seconds`
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), StoreError>;

    /// Store `value` only if `key` is absent; returns whether it was written
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<bool, StoreError>;

    /// Read the value under `key`, `None` if absent or evicted
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key`; returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Check whether `key` is present
    async fn has(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Atomically add one to the integer under `key`, starting from zero
    ///
    /// `ttl_seconds` is applied when the increment creates the key.
    async fn increment(&self, key: &str, ttl_seconds: Option<u64>) -> Result<i64, StoreError>;
}

/// Fire-and-forget hand-off of a code to out-of-band delivery (SMS)
///
/// `dispatch` must not block on delivery; an `Err` only means the job could
/// not be queued.
pub trait DeliveryDispatcher: Send + Sync {
    fn dispatch(&self, identifier: &str, code: &str) -> Result<(), DispatchError>;
}
