use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// E.164 (`+254712345678`) or national (`0712 345 678`) format
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, max = 32))]
    pub phone: String,

    /// The code received by SMS
    #[validate(length(min = 1, max = 16))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemainingTimeQuery {
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub message: String,
    /// Seconds the code stays valid
    pub expires_in: u64,
    /// Seconds until another code can be requested
    pub resend_after: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingTimeResponse {
    pub remaining_seconds: u64,
}
