//! `/api/v1/otp` endpoints

pub mod remaining_time;
pub mod send;
pub mod verify;

use std::sync::Arc;

use mp_core::services::{DeliveryDispatcher, ExpiringStore, OtpService};

pub use remaining_time::remaining_time;
pub use send::send_otp;
pub use verify::verify_otp;

/// Application state that holds shared services
pub struct AppState<S, D>
where
    S: ExpiringStore + ?Sized,
    D: DeliveryDispatcher + ?Sized,
{
    pub otp_service: Arc<OtpService<S, D>>,
}

impl<S, D> AppState<S, D>
where
    S: ExpiringStore + ?Sized,
    D: DeliveryDispatcher + ?Sized,
{
    pub fn new(otp_service: Arc<OtpService<S, D>>) -> Self {
        Self { otp_service }
    }
}
