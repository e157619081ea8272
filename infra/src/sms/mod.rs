//! SMS Service Module
//!
//! SMS service implementations for delivering verification codes.
//!
//! ## Features
//!
//! - **SMS Service Trait**: Common interface for all SMS providers
//! - **Mock Implementation**: Console output for development
//! - **HTTP Gateway**: Production SMS through a bulk-SMS REST API
//! - **Phone Number Validation**: E.164 formatting via `phonenumber`

use std::sync::Arc;

use mp_shared::{SmsConfig, SmsProvider};

pub mod http_gateway;
pub mod mock_sms;
pub mod sms_service;

pub use http_gateway::HttpSmsGateway;
pub use mock_sms::{MockSmsService, SentMessage};
pub use sms_service::{verification_message, SmsService};


/// Create an SMS service based on configuration
///
/// Falls back to the mock service when the configured provider cannot be
/// initialized.
pub fn create_sms_service(config: &SmsConfig) -> Arc<dyn SmsService> {
    match config.provider {
        SmsProvider::Mock => Arc::new(MockSmsService::new()),
        SmsProvider::Http => match HttpSmsGateway::new(config.clone()) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                tracing::error!("Failed to initialize HTTP SMS gateway: {}", e);
                tracing::warn!("Falling back to mock SMS service");
                Arc::new(MockSmsService::new())
            }
        },
    }
}
