//! Shared utilities and common types for the member portal server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - The standard JSON error response
//! - Utility functions (phone normalization, masking)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CacheStrategyConfig, CacheType, DeliveryConfig, Environment,
    IdentifierPolicy, LogFormat, LoggingConfig, MemoryCacheConfig, OtpConfig, ServerConfig,
    SmsConfig, SmsProvider,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::phone;
