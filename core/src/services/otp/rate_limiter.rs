//! Per-identifier send throttling

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use mp_shared::config::otp::MAX_RATE_LIMIT_SECONDS;

use crate::errors::StoreError;

use super::clock::Clock;
use super::config::bounded_seconds;
use super::keys;
use super::traits::ExpiringStore;

/// Marks an identifier as recently sent-to for a fixed window
///
/// The marker stores its own expiry as unix milliseconds, so the wait hint
/// can be derived without a TTL query. A marker whose stored expiry has
/// passed is treated as absent even if the store still holds it.
pub struct RateLimiter<S: ExpiringStore + ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    window_seconds: u64,
}

impl<S: ExpiringStore + ?Sized> RateLimiter<S> {
    /// `window_seconds` is capped at one day
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, window_seconds: u64) -> Self {
        Self {
            store,
            clock,
            window_seconds: window_seconds.min(MAX_RATE_LIMIT_SECONDS),
        }
    }

    pub fn window_seconds(&self) -> u64 {
        self.window_seconds
    }

    /// Whether a send to `identifier` is currently blocked
    pub async fn is_limited(&self, identifier: &str) -> Result<bool, StoreError> {
        Ok(self.retry_after(identifier).await?.is_some())
    }

    /// Seconds until the window closes, rounded up, or `None` when not limited
    pub async fn retry_after(&self, identifier: &str) -> Result<Option<u64>, StoreError> {
        if self.window_seconds == 0 {
            return Ok(None);
        }

        let Some(raw) = self.store.get(&keys::rate_limit_key(identifier)).await? else {
            return Ok(None);
        };

        let now = self.clock.now();
        match parse_marker(&raw) {
            Some(until) if until > now => {
                let millis = (until - now).num_milliseconds();
                Ok(Some(((millis + 999) / 1000).max(1) as u64))
            }
            Some(_) => Ok(None),
            // Unreadable marker: assume the full window
            None => Ok(Some(self.window_seconds)),
        }
    }

    /// Start a fresh window for `identifier`, replacing any existing one
    pub async fn mark_limited(&self, identifier: &str) -> Result<(), StoreError> {
        if self.window_seconds == 0 {
            return Ok(());
        }
        let marker = self.marker_value();
        self.store
            .set(&keys::rate_limit_key(identifier), &marker, self.window_seconds)
            .await
    }

    /// Atomically claim the window; `false` means another send holds it
    pub async fn try_acquire(&self, identifier: &str) -> Result<bool, StoreError> {
        if self.window_seconds == 0 {
            return Ok(true);
        }

        let key = keys::rate_limit_key(identifier);
        let marker = self.marker_value();
        if self
            .store
            .set_if_absent(&key, &marker, self.window_seconds)
            .await?
        {
            return Ok(true);
        }

        // The store may lag behind the clock on eviction
        if self.retry_after(identifier).await?.is_none() {
            self.store.set(&key, &marker, self.window_seconds).await?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Drop the marker, reopening sends immediately
    pub async fn release(&self, identifier: &str) -> Result<(), StoreError> {
        self.store.delete(&keys::rate_limit_key(identifier)).await?;
        Ok(())
    }

    fn marker_value(&self) -> String {
        let until = self.clock.now() + bounded_seconds(self.window_seconds, MAX_RATE_LIMIT_SECONDS);
        until.timestamp_millis().to_string()
    }
}

fn parse_marker(raw: &str) -> Option<DateTime<Utc>> {
    let millis = raw.trim().parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}
