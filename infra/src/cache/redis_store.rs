//! Redis-backed expiring store

use async_trait::async_trait;
use tracing::info;

use mp_core::errors::StoreError;
use mp_core::services::ExpiringStore;
use mp_shared::CacheConfig;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// `ExpiringStore` over Redis, namespacing every key with the configured prefix
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
    config: CacheConfig,
}

impl RedisStore {
    pub fn new(client: RedisClient, config: CacheConfig) -> Self {
        Self { client, config }
    }

    /// Connect to the server described by `config`
    pub async fn connect(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let client = RedisClient::new(&config).await?;
        info!(
            prefix = config.key_prefix.as_deref().unwrap_or(""),
            "Redis OTP store ready"
        );
        Ok(Self::new(client, config))
    }

    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        self.client.health_check().await
    }
}

#[async_trait]
impl ExpiringStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        let key = self.config.make_key(key);
        if ttl_seconds == 0 {
            self.client.set(&key, value).await?;
        } else {
            self.client.set_with_expiry(&key, value, ttl_seconds).await?;
        }
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<bool, StoreError> {
        Ok(self
            .client
            .set_nx_with_expiry(&self.config.make_key(key), value, ttl_seconds)
            .await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.client.get(&self.config.make_key(key)).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.client.delete(&self.config.make_key(key)).await?)
    }

    async fn has(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.client.exists(&self.config.make_key(key)).await?)
    }

    async fn increment(&self, key: &str, ttl_seconds: Option<u64>) -> Result<i64, StoreError> {
        Ok(self
            .client
            .increment(&self.config.make_key(key), ttl_seconds)
            .await?)
    }
}
