//! Queued delivery dispatcher
//!
//! `dispatch` only enqueues; a worker task pulls jobs and runs each delivery
//! in its own task so one slow gateway call never holds up the queue.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use mp_core::errors::DispatchError;
use mp_core::services::DeliveryDispatcher;
use mp_shared::phone::mask_phone_number;
use mp_shared::DeliveryConfig;

use crate::sms::SmsService;

/// One code waiting to be delivered
#[derive(Clone)]
pub struct DeliveryJob {
    pub identifier: String,
    pub code: String,
    pub enqueued_at: DateTime<Utc>,
}

impl fmt::Debug for DeliveryJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryJob")
            .field("identifier", &mask_phone_number(&self.identifier))
            .field("code", &"[redacted]")
            .field("enqueued_at", &self.enqueued_at)
            .finish()
    }
}

/// Retry policy applied to every job
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    /// Attempts per job, including the first
    pub max_tries: u32,
    /// Upper bound on one gateway call
    pub attempt_timeout: Duration,
    /// Pause between attempts
    pub retry_delay: Duration,
    /// Code lifetime quoted in the message
    pub code_ttl_minutes: u64,
}

impl DeliveryPolicy {
    pub fn from_config(config: &DeliveryConfig, code_ttl_minutes: u64) -> Self {
        Self {
            max_tries: config.max_tries.max(1),
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs.max(1)),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            code_ttl_minutes,
        }
    }

    /// Longest a single job can take: every attempt timing out, with the
    /// retry pause between each
    pub fn job_deadline(&self) -> Duration {
        let tries = self.max_tries.max(1);
        self.attempt_timeout
            .saturating_mul(tries)
            .saturating_add(self.retry_delay.saturating_mul(tries - 1))
    }
}

/// `DeliveryDispatcher` feeding a bounded queue
#[derive(Clone)]
pub struct QueuedDeliveryDispatcher {
    sender: mpsc::Sender<DeliveryJob>,
}

impl QueuedDeliveryDispatcher {
    /// Start the worker; it runs until every dispatcher clone is dropped and
    /// all in-flight deliveries have finished
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(
        sms: Arc<dyn SmsService>,
        queue_capacity: usize,
        policy: DeliveryPolicy,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));
        info!(
            provider = sms.provider_name(),
            queue_capacity,
            max_tries = policy.max_tries,
            "Starting SMS delivery worker"
        );
        let worker = tokio::spawn(run_worker(receiver, sms, policy));
        (Self { sender }, worker)
    }

    /// Build from configuration
    pub fn from_config(
        sms: Arc<dyn SmsService>,
        config: &DeliveryConfig,
        code_ttl_minutes: u64,
    ) -> (Self, JoinHandle<()>) {
        Self::spawn(
            sms,
            config.queue_capacity,
            DeliveryPolicy::from_config(config, code_ttl_minutes),
        )
    }
}

impl DeliveryDispatcher for QueuedDeliveryDispatcher {
    fn dispatch(&self, identifier: &str, code: &str) -> Result<(), DispatchError> {
        let job = DeliveryJob {
            identifier: identifier.to_string(),
            code: code.to_string(),
            enqueued_at: Utc::now(),
        };
        self.sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => DispatchError::QueueFull,
            TrySendError::Closed(_) => DispatchError::Closed,
        })
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<DeliveryJob>,
    sms: Arc<dyn SmsService>,
    policy: DeliveryPolicy,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            job = receiver.recv() => match job {
                Some(job) => {
                    in_flight.spawn(deliver(job, sms.clone(), policy.clone()));
                }
                None => break,
            },
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    while in_flight.join_next().await.is_some() {}
    debug!("SMS delivery worker stopped");
}

/// Run one job to completion; true when the gateway accepted the message
pub(crate) async fn deliver(
    job: DeliveryJob,
    sms: Arc<dyn SmsService>,
    policy: DeliveryPolicy,
) -> bool {
    let masked = mask_phone_number(&job.identifier);

    for attempt in 1..=policy.max_tries {
        let outcome = tokio::time::timeout(
            policy.attempt_timeout,
            sms.send_verification_code(&job.identifier, &job.code, policy.code_ttl_minutes),
        )
        .await;

        match outcome {
            Ok(Ok(message_id)) => {
                info!(
                    identifier = %masked,
                    attempt,
                    message_id = %message_id,
                    event = "otp_delivered",
                    "Verification code delivered"
                );
                return true;
            }
            Ok(Err(e)) => {
                warn!(
                    identifier = %masked,
                    attempt,
                    max_tries = policy.max_tries,
                    error = %e,
                    "SMS delivery attempt failed"
                );
            }
            Err(_) => {
                warn!(
                    identifier = %masked,
                    attempt,
                    max_tries = policy.max_tries,
                    timeout_secs = policy.attempt_timeout.as_secs(),
                    "SMS delivery attempt timed out"
                );
            }
        }

        if attempt < policy.max_tries {
            tokio::time::sleep(policy.retry_delay).await;
        }
    }

    error!(
        identifier = %masked,
        tries = policy.max_tries,
        event = "otp_delivery_failed",
        "Giving up on verification code delivery"
    );
    false
}
