//! Application factory
//!
//! Builds the actix-web `App` over any store and dispatcher, so the binary
//! and the integration tests share one routing table.

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use mp_core::services::{DeliveryDispatcher, ExpiringStore};
use mp_shared::errors::{error_codes, ErrorResponse};
use mp_shared::Environment;

use crate::handlers::{json_error_handler, query_error_handler};
use crate::middleware::cors::create_cors;
use crate::routes::otp::{remaining_time, send_otp, verify_otp, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<S, D>(
    app_state: web::Data<AppState<S, D>>,
    environment: Environment,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    S: ExpiringStore + ?Sized + 'static,
    D: DeliveryDispatcher + ?Sized + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        // Last wrap is outermost: every request gets a span, CORS included
        .wrap(create_cors(environment))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/otp")
                        .route("/send", web::post().to(send_otp::<S, D>))
                        .route("/verify", web::post().to(verify_otp::<S, D>))
                        .route("/remaining-time", web::get().to(remaining_time::<S, D>)),
                )
                .route("", web::get().to(api_info)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "member-portal-otp",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_info() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Member Portal OTP API v1",
        "endpoints": {
            "health": "/health",
            "otp": {
                "send": {
                    "path": "/api/v1/otp/send",
                    "method": "POST",
                    "request_body": { "phone": "string" },
                    "responses": {
                        "200": "Code issued and queued for SMS",
                        "422": "Invalid phone number",
                        "429": "Code requested too recently",
                        "503": "OTP store unavailable"
                    }
                },
                "verify": {
                    "path": "/api/v1/otp/verify",
                    "method": "POST",
                    "request_body": { "phone": "string", "code": "string" },
                    "responses": {
                        "200": "Code accepted",
                        "400": "Wrong code",
                        "403": "Too many wrong codes",
                        "410": "No live code"
                    }
                },
                "remaining_time": {
                    "path": "/api/v1/otp/remaining-time?phone=",
                    "method": "GET",
                    "responses": {
                        "200": "Seconds until the live code expires",
                        "410": "No live code"
                    }
                }
            }
        }
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
