//! Request and response bodies

pub mod otp;

pub use otp::{
    RemainingTimeQuery, RemainingTimeResponse, SendOtpRequest, SendOtpResponse,
    VerifyOtpRequest, VerifyOtpResponse,
};
