//! SMS gateway and delivery queue configuration

use serde::{Deserialize, Serialize};

/// SMS provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Log messages instead of sending them
    #[default]
    Mock,
    /// Bulk SMS REST gateway
    Http,
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(SmsProvider::Mock),
            "http" | "gateway" => Ok(SmsProvider::Http),
            _ => Err(format!("Invalid SMS provider: {}", s)),
        }
    }
}

/// SMS service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    /// SMS service provider
    pub provider: SmsProvider,
    /// Gateway endpoint for the HTTP provider
    pub api_url: String,
    /// Gateway account username
    pub username: String,
    /// Gateway API key
    pub api_key: String,
    /// Registered sender id / short code, if any
    pub sender_id: Option<String>,
    /// Timeout for a single gateway request in seconds
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            api_url: String::from("https://api.africastalking.com/version1/messaging"),
            username: String::from("sandbox"),
            api_key: String::new(),
            sender_id: None,
            request_timeout_secs: 30,
        }
    }
}

impl SmsConfig {
    /// Load SMS config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("SMS_PROVIDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.provider),
            api_url: std::env::var("SMS_API_URL").unwrap_or(defaults.api_url),
            username: std::env::var("SMS_USERNAME").unwrap_or(defaults.username),
            api_key: std::env::var("SMS_API_KEY").unwrap_or_default(),
            sender_id: std::env::var("SMS_SENDER_ID").ok().filter(|s| !s.is_empty()),
            request_timeout_secs: std::env::var("SMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }
}

/// Retry policy and queue sizing for out-of-band code delivery
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Attempts per delivery job, including the first
    pub max_tries: u32,
    /// Upper bound on a single attempt in seconds
    pub attempt_timeout_secs: u64,
    /// Pause between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Jobs buffered before `dispatch` starts rejecting
    pub queue_capacity: usize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_tries: 3,
            attempt_timeout_secs: 30,
            retry_delay_ms: 1000,
            queue_capacity: 1024,
        }
    }
}

impl DeliveryConfig {
    /// Load delivery config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let parse = |key: &str| std::env::var(key).ok();
        Self {
            max_tries: parse("DELIVERY_MAX_TRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tries),
            attempt_timeout_secs: parse("DELIVERY_ATTEMPT_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.attempt_timeout_secs),
            retry_delay_ms: parse("DELIVERY_RETRY_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_delay_ms),
            queue_capacity: parse("DELIVERY_QUEUE_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.queue_capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_defaults_match_job_policy() {
        let config = DeliveryConfig::default();
        assert_eq!(config.max_tries, 3);
        assert_eq!(config.attempt_timeout_secs, 30);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("mock".parse::<SmsProvider>().unwrap(), SmsProvider::Mock);
        assert_eq!("HTTP".parse::<SmsProvider>().unwrap(), SmsProvider::Http);
        assert!("twilio".parse::<SmsProvider>().is_err());
    }
}
