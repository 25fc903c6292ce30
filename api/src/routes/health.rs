use actix_web::HttpResponse;
use chrono::Utc;

use sv_shared::types::{ApiResponse, HealthResponse, HealthStatus};

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(HealthResponse {
        status: HealthStatus::Healthy,
        service: "sms-verify-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    }))
}
