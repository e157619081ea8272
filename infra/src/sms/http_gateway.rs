//! HTTP bulk-SMS gateway
//!
//! Sends messages through a REST messaging endpoint (Africa's Talking
//! compatible): a form-encoded POST authenticated with an `apiKey` header,
//! answered with a JSON report per recipient.

use async_trait::async_trait;
use phonenumber::{Mode, PhoneNumber};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use mp_shared::phone::mask_phone_number;
use mp_shared::SmsConfig;

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// Recipient status codes the gateway reports for accepted messages
const ACCEPTED_STATUS_CODES: [u16; 3] = [100, 101, 102];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GatewayResponse {
    #[serde(rename = "SMSMessageData")]
    pub sms_message_data: MessageData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct MessageData {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Recipient {
    pub status_code: u16,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message_id: String,
}

/// SMS service backed by an HTTP messaging gateway
pub struct HttpSmsGateway {
    client: reqwest::Client,
    config: SmsConfig,
}

impl HttpSmsGateway {
    /// Create a gateway client; fails when credentials are missing
    pub fn new(config: SmsConfig) -> Result<Self, InfrastructureError> {
        if config.api_key.trim().is_empty() {
            return Err(InfrastructureError::Config("SMS_API_KEY not set".to_string()));
        }
        if config.username.trim().is_empty() {
            return Err(InfrastructureError::Config("SMS_USERNAME not set".to_string()));
        }
        reqwest::Url::parse(&config.api_url).map_err(|e| {
            InfrastructureError::Config(format!("Invalid SMS_API_URL '{}': {}", config.api_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;

        info!(
            username = %config.username,
            sender_id = config.sender_id.as_deref().unwrap_or("-"),
            "HTTP SMS gateway initialized"
        );

        Ok(Self { client, config })
    }

    /// Validate and format a recipient in E.164
    pub(crate) fn format_recipient(phone: &str) -> Result<String, InfrastructureError> {
        let parsed = phone.parse::<PhoneNumber>().map_err(|e| {
            InfrastructureError::Sms(format!(
                "Invalid phone number {}: {}",
                mask_phone_number(phone),
                e
            ))
        })?;

        if !phonenumber::is_valid(&parsed) {
            return Err(InfrastructureError::Sms(format!(
                "Phone number {} is not a valid number",
                mask_phone_number(phone)
            )));
        }

        Ok(parsed.format().mode(Mode::E164).to_string())
    }

    /// Extract the message id from a gateway report, or the rejection reason
    pub(crate) fn interpret_response(
        response: GatewayResponse,
    ) -> Result<String, InfrastructureError> {
        let data = response.sms_message_data;
        match data.recipients.first() {
            Some(recipient) if ACCEPTED_STATUS_CODES.contains(&recipient.status_code) => {
                Ok(recipient.message_id.clone())
            }
            Some(recipient) => Err(InfrastructureError::Sms(format!(
                "Gateway rejected message: {} ({})",
                recipient.status, recipient.status_code
            ))),
            None => Err(InfrastructureError::Sms(format!(
                "Gateway accepted no recipients: {}",
                data.message
            ))),
        }
    }
}

#[async_trait]
impl SmsService for HttpSmsGateway {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let to = Self::format_recipient(phone_number)?;
        let masked = mask_phone_number(&to);

        let mut form = vec![
            ("username", self.config.username.as_str()),
            ("to", to.as_str()),
            ("message", message),
        ];
        if let Some(sender_id) = self.config.sender_id.as_deref() {
            form.push(("from", sender_id));
        }

        debug!(phone = %masked, "Posting SMS to gateway");

        let response = self
            .client
            .post(&self.config.api_url)
            .header("apiKey", &self.config.api_key)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                phone = %masked,
                status = status.as_u16(),
                "SMS gateway returned an error status"
            );
            return Err(InfrastructureError::Sms(format!(
                "Gateway responded with {}: {}",
                status, body
            )));
        }

        let report: GatewayResponse = response.json().await?;
        let message_id = Self::interpret_response(report)?;

        info!(
            target: "sms_service",
            provider = "http",
            phone = %masked,
            message_id = %message_id,
            "SMS accepted by gateway"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "HTTP Gateway"
    }
}
