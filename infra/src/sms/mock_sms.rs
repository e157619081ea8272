//! Mock SMS Service Implementation
//!
//! A mock implementation of the SMS service for development and testing.
//! Messages are logged (and optionally printed) instead of being sent.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mp_shared::phone::{is_valid_international_phone, mask_phone_number};

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// A message accepted by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub phone_number: String,
    pub message: String,
    pub message_id: String,
}

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Logs SMS messages instead of sending them
/// - Validates E.164 phone numbers
/// - Generates mock message IDs
/// - Records sent messages and can fail on demand
pub struct MockSmsService {
    /// Number of messages accepted
    message_count: AtomicU64,
    /// Fail every send while set
    simulate_failure: AtomicBool,
    /// Fail this many upcoming sends, then recover
    failures_remaining: AtomicU32,
    /// Print each message to stdout
    console_output: bool,
    /// Simulated network latency
    latency: Duration,
    sent: Mutex<Vec<SentMessage>>,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new() -> Self {
        Self::with_options(true, Duration::from_millis(100))
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, latency: Duration) -> Self {
        Self {
            message_count: AtomicU64::new(0),
            simulate_failure: AtomicBool::new(false),
            failures_remaining: AtomicU32::new(0),
            console_output,
            latency,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Quiet, instant mock for tests
    pub fn silent() -> Self {
        Self::with_options(false, Duration::ZERO)
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Fail the next `count` sends
    pub fn fail_next(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Messages accepted so far
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn should_fail(&self) -> bool {
        if self.simulate_failure.load(Ordering::SeqCst) {
            return true;
        }
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let masked_phone = mask_phone_number(phone_number);

        if !is_valid_international_phone(phone_number) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                masked_phone
            )));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.should_fail() {
            warn!(
                "Mock SMS service simulating failure for phone: {}",
                masked_phone
            );
            return Err(InfrastructureError::Sms(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK SMS SERVICE - MESSAGE #{}", count);
            println!("To: {}", phone_number);
            println!("Message ID: {}", message_id);
            println!("Content: {}", message);
            println!("{}\n", "=".repeat(60));
        }

        debug!(target: "sms_service", content = message, "Mock SMS content");
        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            message_length = message.len(),
            "SMS sent successfully (mock)"
        );

        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentMessage {
                phone_number: phone_number.to_string(),
                message: message.to_string(),
                message_id: message_id.clone(),
            });

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure.load(Ordering::SeqCst)
    }
}
