use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use mp_api::{config, create_app, telemetry, AppState};
use mp_core::services::{OtpService, OtpServiceConfig};
use mp_infra::{build_store, create_sms_service, DeliveryPolicy, QueuedDeliveryDispatcher};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = config::load().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging)?;
    config
        .otp
        .validate()
        .context("invalid OTP configuration")?;

    info!(
        environment = %config.environment,
        store = ?config.cache.cache_type,
        sms_provider = ?config.sms.provider,
        "Starting member portal OTP server"
    );

    let store = Arc::new(
        build_store(&config.cache)
            .await
            .context("failed to initialize OTP store")?,
    );
    if !store.health_check().await {
        warn!(store = store.kind(), "OTP store failed its initial health check");
    }

    let sms = create_sms_service(&config.sms);
    let (dispatcher, delivery_worker) = QueuedDeliveryDispatcher::from_config(
        sms,
        &config.delivery,
        config.otp.code_ttl_minutes(),
    );

    let otp_service = Arc::new(OtpService::new(
        store,
        Arc::new(dispatcher),
        OtpServiceConfig::from(&config.otp),
    ));
    let app_state = web::Data::new(AppState::new(otp_service));

    let bind_address = config.server.bind_address();
    let environment = config.environment;
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone(), environment))
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    // The server owned the last dispatcher handles; let queued SMS finish
    let drain = DeliveryPolicy::from_config(&config.delivery, config.otp.code_ttl_minutes())
        .job_deadline();
    match tokio::time::timeout(drain, delivery_worker).await {
        Ok(_) => info!("Delivery queue drained"),
        Err(_) => warn!("Shutting down with SMS deliveries still in flight"),
    }

    Ok(())
}
