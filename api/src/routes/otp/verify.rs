use actix_web::{web, HttpResponse};
use validator::Validate;

use mp_core::services::{DeliveryDispatcher, ExpiringStore};

use super::AppState;
use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::{otp_error_response, validation_error_response};

/// Handler for POST /api/v1/otp/verify
///
/// A correct code consumes the challenge; it cannot be used twice.
///
/// ## Errors
/// - 400: wrong code (`details.remaining_attempts`)
/// - 403: too many wrong codes, the code is revoked
/// - 410: no live code for this phone
pub async fn verify_otp<S, D>(
    state: web::Data<AppState<S, D>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    S: ExpiringStore + ?Sized + 'static,
    D: DeliveryDispatcher + ?Sized + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.otp_service.verify(&request.phone, &request.code).await {
        Ok(()) => HttpResponse::Ok().json(VerifyOtpResponse { verified: true }),
        Err(e) => otp_error_response(&e),
    }
}
