//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Expiring store backend and Redis configuration
//! - `environment` - Environment detection and logging configuration
//! - `otp` - One-time password lifetimes, throttling and attempt ceilings
//! - `server` - HTTP server configuration
//! - `sms` - SMS gateway and delivery queue configuration

pub mod cache;
pub mod environment;
pub mod otp;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::{CacheConfig, CacheStrategyConfig, CacheType, MemoryCacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{IdentifierPolicy, OtpConfig, OtpConfigError};
pub use server::ServerConfig;
pub use sms::{DeliveryConfig, SmsConfig, SmsProvider};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Expiring store configuration
    #[serde(default)]
    pub cache: CacheStrategyConfig,

    /// One-time password configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// SMS gateway configuration
    #[serde(default)]
    pub sms: SmsConfig,

    /// Delivery queue configuration
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            cache: CacheStrategyConfig::default(),
            otp: OtpConfig::default(),
            sms: SmsConfig::default(),
            delivery: DeliveryConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::new("127.0.0.1", 8080),
            cache: CacheStrategyConfig::memory(),
            logging: LoggingConfig::for_environment(Environment::Development),
            ..Default::default()
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            cache: CacheStrategyConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
            ..Default::default()
        }
    }

    /// Load configuration from environment
    ///
    /// Picks the environment preset, then overlays the per-area `from_env`
    /// loaders on top of it.
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::production();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };

        config.server = ServerConfig::from_env_or(config.server);
        config.cache = CacheStrategyConfig::from_env_or(config.cache);
        config.otp = OtpConfig::from_env();
        config.sms = SmsConfig::from_env();
        config.delivery = DeliveryConfig::from_env();
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        config
    }
}
