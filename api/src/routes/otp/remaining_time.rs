use actix_web::{web, HttpResponse};
use validator::Validate;

use mp_core::services::{DeliveryDispatcher, ExpiringStore};

use super::AppState;
use crate::dto::{RemainingTimeQuery, RemainingTimeResponse};
use crate::handlers::{otp_error_response, validation_error_response};

/// Handler for GET /api/v1/otp/remaining-time?phone=...
pub async fn remaining_time<S, D>(
    state: web::Data<AppState<S, D>>,
    query: web::Query<RemainingTimeQuery>,
) -> HttpResponse
where
    S: ExpiringStore + ?Sized + 'static,
    D: DeliveryDispatcher + ?Sized + 'static,
{
    if let Err(errors) = query.validate() {
        return validation_error_response(&errors);
    }

    match state.otp_service.remaining_time(&query.phone).await {
        Ok(remaining_seconds) => HttpResponse::Ok().json(RemainingTimeResponse { remaining_seconds }),
        Err(e) => otp_error_response(&e),
    }
}
