//! Failed-verification counting

use std::sync::Arc;

use crate::errors::StoreError;

use super::keys;
use super::traits::ExpiringStore;

/// Counts wrong guesses against the live code for an identifier
///
/// The counter carries the code's TTL so it cannot outlive the challenge it
/// belongs to by more than one code lifetime.
pub struct AttemptCounter<S: ExpiringStore + ?Sized> {
    store: Arc<S>,
    max_attempts: u32,
    ttl_seconds: u64,
}

impl<S: ExpiringStore + ?Sized> AttemptCounter<S> {
    pub fn new(store: Arc<S>, max_attempts: u32, ttl_seconds: u64) -> Self {
        Self {
            store,
            max_attempts,
            ttl_seconds,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Failures recorded so far, zero when no counter exists
    pub async fn count(&self, identifier: &str) -> Result<u32, StoreError> {
        let key = keys::attempts_key(identifier);
        match self.store.get(&key).await? {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(clamp_count)
                .map_err(|e| StoreError::InvalidValue {
                    key,
                    message: e.to_string(),
                }),
        }
    }

    /// Atomically add one failure and return the new total
    pub async fn record_failure(&self, identifier: &str) -> Result<u32, StoreError> {
        let total = self
            .store
            .increment(&keys::attempts_key(identifier), Some(self.ttl_seconds))
            .await?;
        Ok(clamp_count(total))
    }

    /// Remove the counter
    pub async fn reset(&self, identifier: &str) -> Result<(), StoreError> {
        self.store.delete(&keys::attempts_key(identifier)).await?;
        Ok(())
    }

    pub fn is_exhausted(&self, count: u32) -> bool {
        count >= self.max_attempts
    }

    pub fn remaining(&self, count: u32) -> u32 {
        self.max_attempts.saturating_sub(count)
    }
}

fn clamp_count(raw: i64) -> u32 {
    raw.clamp(0, u32::MAX as i64) as u32
}
