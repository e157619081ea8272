//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    AttemptCounter, Clock, DeliveryDispatcher, ExpiringStore, ManualClock, OtpGenerator,
    OtpService, OtpServiceConfig, RateLimiter, SendOtpResult, SystemClock,
};
