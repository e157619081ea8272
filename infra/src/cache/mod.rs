//! Cache module for the OTP expiring store
//!
//! Provides the Redis-backed store used in production, an in-memory store for
//! development and tests, and `StoreBackend` to pick one at startup.

pub mod memory_store;
pub mod redis_client;
pub mod redis_store;


use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use mp_core::errors::StoreError;
use mp_core::services::ExpiringStore;
use mp_shared::{CacheStrategyConfig, CacheType};

pub use memory_store::MemoryStore;
pub use redis_client::RedisClient;
pub use redis_store::RedisStore;

use crate::InfrastructureError;

/// The store selected by configuration
#[derive(Clone)]
pub enum StoreBackend {
    Redis(RedisStore),
    Memory(Arc<MemoryStore>),
}

impl StoreBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreBackend::Redis(_) => "redis",
            StoreBackend::Memory(_) => "memory",
        }
    }

    /// Whether the backing store answers
    pub async fn health_check(&self) -> bool {
        match self {
            StoreBackend::Redis(store) => store.health_check().await.unwrap_or(false),
            StoreBackend::Memory(_) => true,
        }
    }
}

/// Build the store described by `config`
///
/// The memory backend gets a background purge task, so this must run inside
/// a tokio runtime.
pub async fn build_store(config: &CacheStrategyConfig) -> Result<StoreBackend, InfrastructureError> {
    match config.cache_type {
        CacheType::Redis => {
            let store = RedisStore::connect(config.redis.clone()).await?;
            Ok(StoreBackend::Redis(store))
        }
        CacheType::Memory => {
            info!("Using in-memory OTP store; state is lost on restart");
            let store = Arc::new(MemoryStore::new());
            store.spawn_cleanup(Duration::from_secs(config.memory.cleanup_interval.max(1)));
            Ok(StoreBackend::Memory(store))
        }
    }
}

#[async_trait]
impl ExpiringStore for StoreBackend {
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        match self {
            StoreBackend::Redis(store) => store.set(key, value, ttl_seconds).await,
            StoreBackend::Memory(store) => store.set(key, value, ttl_seconds).await,
        }
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<bool, StoreError> {
        match self {
            StoreBackend::Redis(store) => store.set_if_absent(key, value, ttl_seconds).await,
            StoreBackend::Memory(store) => store.set_if_absent(key, value, ttl_seconds).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            StoreBackend::Redis(store) => store.get(key).await,
            StoreBackend::Memory(store) => store.get(key).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        match self {
            StoreBackend::Redis(store) => store.delete(key).await,
            StoreBackend::Memory(store) => store.delete(key).await,
        }
    }

    async fn has(&self, key: &str) -> Result<bool, StoreError> {
        match self {
            StoreBackend::Redis(store) => store.has(key).await,
            StoreBackend::Memory(store) => store.has(key).await,
        }
    }

    async fn increment(&self, key: &str, ttl_seconds: Option<u64>) -> Result<i64, StoreError> {
        match self {
            StoreBackend::Redis(store) => store.increment(key, ttl_seconds).await,
            StoreBackend::Memory(store) => store.increment(key, ttl_seconds).await,
        }
    }
}
