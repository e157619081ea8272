use actix_web::{web, HttpResponse};
use validator::Validate;

use mp_core::services::{DeliveryDispatcher, ExpiringStore};

use super::AppState;
use crate::dto::{SendOtpRequest, SendOtpResponse};
use crate::handlers::{otp_error_response, validation_error_response};

/// Handler for POST /api/v1/otp/send
///
/// Issues a new code and queues it for SMS delivery.
///
/// # Request Body
///
/// ```json
/// { "phone": "+254712345678" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "message": "Verification code sent", "expires_in": 300, "resend_after": 60 }
/// ```
///
/// ## Errors
/// - 422: malformed phone number
/// - 429: a code was sent too recently (`Retry-After` set)
/// - 503: OTP store unavailable
pub async fn send_otp<S, D>(
    state: web::Data<AppState<S, D>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    S: ExpiringStore + ?Sized + 'static,
    D: DeliveryDispatcher + ?Sized + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.otp_service.send(&request.phone).await {
        Ok(result) => {
            let issued_at = result.record.issued_at;
            HttpResponse::Ok().json(SendOtpResponse {
                message: "Verification code sent".to_string(),
                expires_in: result.expires_in_seconds(issued_at),
                resend_after: state.otp_service.config().rate_limit_seconds,
            })
        }
        Err(e) => otp_error_response(&e),
    }
}
