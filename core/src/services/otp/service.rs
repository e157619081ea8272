//! OTP lifecycle manager

use std::sync::Arc;

use mp_shared::config::otp::MAX_RATE_LIMIT_SECONDS;
use mp_shared::phone::mask_phone_number;

use crate::domain::OtpRecord;
use crate::errors::{OtpError, OtpResult, StoreError};

use super::attempt_counter::AttemptCounter;
use super::clock::{Clock, SystemClock};
use super::config::{bounded_seconds, OtpServiceConfig};
use super::generator::OtpGenerator;
use super::identifier::normalize_identifier;
use super::keys;
use super::rate_limiter::RateLimiter;
use super::traits::{DeliveryDispatcher, ExpiringStore};
use super::types::SendOtpResult;

/// Issues and verifies one-time passwords
///
/// The service is stateless: every fact it relies on lives in the store, so
/// any number of instances may share one store.
pub struct OtpService<S: ExpiringStore + ?Sized, D: DeliveryDispatcher + ?Sized> {
    /// Backing store for records, throttle markers and counters
    store: Arc<S>,
    /// Out-of-band delivery hand-off
    dispatcher: Arc<D>,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: OtpServiceConfig,
    generator: OtpGenerator,
    rate_limiter: RateLimiter<S>,
    attempts: AttemptCounter<S>,
}

impl<S: ExpiringStore + ?Sized, D: DeliveryDispatcher + ?Sized> OtpService<S, D> {
    /// Create a service driven by the system clock
    pub fn new(store: Arc<S>, dispatcher: Arc<D>, config: OtpServiceConfig) -> Self {
        Self::with_clock(store, dispatcher, Arc::new(SystemClock), config)
    }

    /// Create a service with an explicit time source
    ///
    /// Lifetimes beyond one day are capped.
    pub fn with_clock(
        store: Arc<S>,
        dispatcher: Arc<D>,
        clock: Arc<dyn Clock>,
        config: OtpServiceConfig,
    ) -> Self {
        let bounded = config.bounded();
        if bounded != config {
            tracing::warn!(
                code_ttl_seconds = config.code_ttl_seconds,
                rate_limit_seconds = config.rate_limit_seconds,
                "OTP lifetimes capped at one day"
            );
        }
        let config = bounded;
        let generator = OtpGenerator::new(config.code_length, config.code_ttl_seconds);
        let rate_limiter =
            RateLimiter::new(store.clone(), clock.clone(), config.rate_limit_seconds);
        let attempts =
            AttemptCounter::new(store.clone(), config.max_attempts, config.code_ttl_seconds);

        Self {
            store,
            dispatcher,
            clock,
            config,
            generator,
            rate_limiter,
            attempts,
        }
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Issue a fresh code to `identifier` and queue it for delivery
    ///
    /// This method:
    /// 1. Normalizes the identifier
    /// 2. Claims the send window, failing with the wait time if it is held
    /// 3. Stores a new record, replacing any outstanding one
    /// 4. Clears the failed-attempt counter
    /// 5. Hands the code to the dispatcher without waiting on delivery
    pub async fn send(&self, identifier: &str) -> OtpResult<SendOtpResult> {
        let identifier = normalize_identifier(self.config.identifier_policy, identifier)?;
        let masked = mask_phone_number(&identifier);

        if !self.rate_limiter.try_acquire(&identifier).await? {
            let retry_after_seconds = self
                .rate_limiter
                .retry_after(&identifier)
                .await?
                .unwrap_or(self.rate_limiter.window_seconds())
                .max(1);
            tracing::warn!(
                identifier = %masked,
                retry_after_seconds,
                event = "otp_rate_limited",
                "OTP send rejected by rate limit"
            );
            return Err(OtpError::RateLimited { retry_after_seconds });
        }

        let now = self.clock.now();
        let record = self.generator.generate(&identifier, now);

        if let Err(e) = self.install_challenge(&record).await {
            tracing::error!(
                identifier = %masked,
                error = %e,
                event = "otp_storage_failed",
                "Failed to store OTP record"
            );
            // Best effort: a failed send should not lock the identifier out
            if let Err(release_err) = self.rate_limiter.release(&identifier).await {
                tracing::warn!(
                    identifier = %masked,
                    error = %release_err,
                    "Failed to release rate limit marker"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            identifier = %masked,
            expires_at = %record.expires_at,
            event = "otp_generated",
            "Issued new OTP"
        );

        let dispatched = match self.dispatcher.dispatch(&identifier, &record.token) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    identifier = %masked,
                    error = %e,
                    event = "otp_dispatch_failed",
                    "Failed to queue OTP for delivery"
                );
                false
            }
        };

        Ok(SendOtpResult {
            next_resend_at: now
                + bounded_seconds(self.config.rate_limit_seconds, MAX_RATE_LIMIT_SECONDS),
            record,
            dispatched,
        })
    }

    /// Check `candidate` against the live code for `identifier`
    ///
    /// A correct code consumes the challenge. Wrong or malformed codes count
    /// as failures; reaching the ceiling revokes the code.
    pub async fn verify(&self, identifier: &str, candidate: &str) -> OtpResult<()> {
        let identifier = normalize_identifier(self.config.identifier_policy, identifier)?;
        let masked = mask_phone_number(&identifier);

        let record = self.load_live_record(&identifier).await?;

        let failures = self.attempts.count(&identifier).await?;
        if self.attempts.is_exhausted(failures) {
            self.clear_challenge(&identifier).await?;
            tracing::warn!(
                identifier = %masked,
                attempts = failures,
                event = "otp_attempts_exceeded",
                "OTP revoked after too many failed attempts"
            );
            return Err(OtpError::AttemptsExceeded);
        }

        if record.matches(candidate.trim()) {
            // Only the caller whose delete removed the record wins
            let consumed = self.store.delete(&keys::record_key(&identifier)).await?;
            self.attempts.reset(&identifier).await?;
            if !consumed {
                return Err(OtpError::OtpExpiredOrMissing);
            }
            tracing::info!(
                identifier = %masked,
                event = "otp_verified",
                "OTP verified"
            );
            return Ok(());
        }

        let failures = self.attempts.record_failure(&identifier).await?;
        if self.attempts.is_exhausted(failures) {
            self.clear_challenge(&identifier).await?;
            tracing::warn!(
                identifier = %masked,
                attempts = failures,
                event = "otp_attempts_exceeded",
                "OTP revoked after too many failed attempts"
            );
            return Err(OtpError::AttemptsExceeded);
        }

        let remaining_attempts = self.attempts.remaining(failures);
        tracing::warn!(
            identifier = %masked,
            attempts = failures,
            remaining_attempts,
            event = "otp_verification_failed",
            "OTP verification failed"
        );
        Err(OtpError::InvalidOtp { remaining_attempts })
    }

    /// Seconds until the live code for `identifier` expires, rounded up
    pub async fn remaining_time(&self, identifier: &str) -> OtpResult<u64> {
        let identifier = normalize_identifier(self.config.identifier_policy, identifier)?;
        let record = self.load_live_record(&identifier).await?;
        Ok(record.remaining_seconds_at(self.clock.now()))
    }

    /// Wrong guesses still allowed against the live code
    pub async fn remaining_attempts(&self, identifier: &str) -> OtpResult<u32> {
        let identifier = normalize_identifier(self.config.identifier_policy, identifier)?;
        self.load_live_record(&identifier).await?;
        let failures = self.attempts.count(&identifier).await?;
        Ok(self.attempts.remaining(failures))
    }

    /// Revoke any live code for `identifier`; the send window is untouched
    pub async fn invalidate(&self, identifier: &str) -> OtpResult<()> {
        let identifier = normalize_identifier(self.config.identifier_policy, identifier)?;
        self.clear_challenge(&identifier).await?;
        tracing::info!(
            identifier = %mask_phone_number(&identifier),
            event = "otp_invalidated",
            "OTP invalidated"
        );
        Ok(())
    }

    /// Store `record` and clear the counter; on failure the new record is
    /// withdrawn so nothing undelivered stays live
    async fn install_challenge(&self, record: &OtpRecord) -> Result<(), StoreError> {
        self.store_record(record).await?;
        if let Err(e) = self.attempts.reset(&record.identifier).await {
            if let Err(delete_err) = self.store.delete(&keys::record_key(&record.identifier)).await {
                tracing::warn!(
                    identifier = %mask_phone_number(&record.identifier),
                    error = %delete_err,
                    "Failed to withdraw OTP record"
                );
            }
            return Err(e);
        }
        Ok(())
    }

    async fn store_record(&self, record: &OtpRecord) -> Result<(), StoreError> {
        let key = keys::record_key(&record.identifier);
        let payload = record.to_json().map_err(|e| StoreError::InvalidValue {
            key: key.clone(),
            message: e.to_string(),
        })?;
        self.store
            .set(&key, &payload, self.config.code_ttl_seconds)
            .await
    }

    /// Fetch the record if it is present, readable and unexpired
    ///
    /// Stale or corrupt records are pruned together with their counter.
    async fn load_live_record(&self, identifier: &str) -> OtpResult<OtpRecord> {
        let raw = self
            .store
            .get(&keys::record_key(identifier))
            .await?
            .ok_or(OtpError::OtpExpiredOrMissing)?;

        let record = match OtpRecord::from_json(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    identifier = %mask_phone_number(identifier),
                    error = %e,
                    "Discarding unreadable OTP record"
                );
                self.clear_challenge(identifier).await?;
                return Err(OtpError::OtpExpiredOrMissing);
            }
        };

        if record.is_expired_at(self.clock.now()) {
            self.clear_challenge(identifier).await?;
            return Err(OtpError::OtpExpiredOrMissing);
        }

        Ok(record)
    }

    async fn clear_challenge(&self, identifier: &str) -> Result<(), StoreError> {
        self.store.delete(&keys::record_key(identifier)).await?;
        self.attempts.reset(identifier).await
    }
}
