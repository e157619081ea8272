//! Mapping of OTP outcomes to HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use mp_core::errors::OtpError;
use mp_shared::errors::{error_codes, ErrorResponse};

/// HTTP status for each OTP outcome
pub fn status_for(error: &OtpError) -> StatusCode {
    match error {
        OtpError::InvalidIdentifier { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        OtpError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        OtpError::OtpExpiredOrMissing => StatusCode::GONE,
        OtpError::AttemptsExceeded => StatusCode::FORBIDDEN,
        OtpError::InvalidOtp { .. } => StatusCode::BAD_REQUEST,
        OtpError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Render an OTP error as the standard JSON error body
///
/// Rate-limited responses also carry `Retry-After`.
pub fn otp_error_response(error: &OtpError) -> HttpResponse {
    if error.is_infrastructure() {
        tracing::error!(error = %error, "OTP request failed on infrastructure");
    }

    let mut builder = HttpResponse::build(status_for(error));
    if let OtpError::RateLimited { retry_after_seconds } = error {
        builder.insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()));
    }
    builder.json(ErrorResponse::from(error))
}

/// 422 with the offending fields listed under `details.fields`
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();

    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed")
        .add_detail("fields", fields);
    HttpResponse::UnprocessableEntity().json(body)
}

/// Undecodable JSON bodies get the standard error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, format!("Invalid request body: {}", err));
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Missing or malformed query strings get the standard error shape
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, format!("Invalid query string: {}", err));
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_outcome_has_distinct_status() {
        let errors = [
            OtpError::InvalidIdentifier { reason: "empty".to_string() },
            OtpError::RateLimited { retry_after_seconds: 10 },
            OtpError::OtpExpiredOrMissing,
            OtpError::AttemptsExceeded,
            OtpError::InvalidOtp { remaining_attempts: 2 },
            OtpError::StoreUnavailable { message: "down".to_string() },
        ];
        let mut statuses: Vec<u16> = errors.iter().map(|e| status_for(e).as_u16()).collect();
        statuses.sort_unstable();
        statuses.dedup();
        assert_eq!(statuses.len(), errors.len());
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = otp_error_response(&OtpError::RateLimited { retry_after_seconds: 42 });
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "42"
        );
    }

    #[test]
    fn test_expired_has_no_retry_after() {
        let response = otp_error_response(&OtpError::OtpExpiredOrMissing);
        assert_eq!(response.status(), StatusCode::GONE);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
