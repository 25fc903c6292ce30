//! Application routing
//!
//! Routes are registered through `configure` so the binary and the tests
//! build the same service tree.

use actix_web::{web, HttpResponse};

use sv_core::services::VerificationProviderTrait;
use sv_shared::types::ApiResponse;

use crate::routes::{balance, health, verifications};

/// Register every route for provider `P`
pub fn configure<P>(cfg: &mut web::ServiceConfig)
where
    P: VerificationProviderTrait + 'static,
{
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/verifications")
                        .route("", web::post().to(verifications::start_verification::<P>))
                        .route("/{id}", web::get().to(verifications::get_verification::<P>))
                        .route("/{id}", web::delete().to(verifications::cancel_verification::<P>)),
                )
                .route("/balance", web::get().to(balance::get_balance::<P>)),
        );
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(
        "not_found",
        "The requested resource was not found",
    ))
}
