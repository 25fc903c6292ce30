use std::sync::Arc;
use std::time::Duration;

use actix_web::{rt, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use sv_api::app::{configure, not_found};
use sv_api::routes::AppState;
use sv_api::telemetry::init_tracing;
use sv_core::services::{VerificationService, VerificationServiceConfig};
use sv_infra::{TextVerifiedClient, TextVerifiedConfig};
use sv_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()
        .map_err(|err| anyhow::anyhow!(err))
        .context("invalid application configuration")?;
    init_tracing(&config.logging)?;

    tracing::info!(environment = %config.environment, "Starting SmsVerify API server");

    let provider_config = TextVerifiedConfig::from_env().context("invalid provider configuration")?;
    let service_config =
        VerificationServiceConfig::from_polling(&config.polling, provider_config.retry_policy());
    let provider = Arc::new(TextVerifiedClient::new(provider_config)?);
    let service = Arc::new(VerificationService::new(provider, service_config));

    let retention = config.server.session_retention();
    let state = web::Data::new(AppState::with_session_retention(service, retention));

    // Evict finished sessions even when no new ones arrive
    let sessions = state.sessions.clone();
    rt::spawn(async move {
        let mut ticker = rt::time::interval(retention.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            sessions.prune().await;
        }
    });

    let bind_address = config.server.bind_address();
    tracing::info!(bind_address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .configure(configure::<TextVerifiedClient>)
            .default_service(web::route().to(not_found))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
