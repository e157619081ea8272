//! SMS Service Interface
//!
//! Defines the trait for SMS service implementations that deliver
//! verification codes.

use async_trait::async_trait;

use crate::InfrastructureError;

/// SMS service trait for sending text messages
///
/// Implementations include:
/// - HTTP bulk-SMS gateway
/// - Mock implementation for development
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message to a phone number
    ///
    /// # Arguments
    ///
    /// * `phone_number` - The recipient's phone number (E.164 format)
    /// * `message` - The message content to send
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Gateway identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError>;

    /// Send a verification code via SMS using the standard message copy
    async fn send_verification_code(
        &self,
        phone_number: &str,
        code: &str,
        ttl_minutes: u64,
    ) -> Result<String, InfrastructureError> {
        let message = verification_message(code, ttl_minutes);
        self.send_sms(phone_number, &message).await
    }

    /// Get the service provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is available
    async fn is_available(&self) -> bool {
        true
    }
}

/// Message body carrying a verification code
pub fn verification_message(code: &str, ttl_minutes: u64) -> String {
    let unit = if ttl_minutes == 1 { "minute" } else { "minutes" };
    format!(
        "Your verification code is {}. It expires in {} {}. Do not share it with anyone.",
        code, ttl_minutes, unit
    )
}
