use actix_web::{web, HttpResponse};

use sv_core::services::VerificationProviderTrait;
use sv_shared::types::ApiResponse;

use crate::dto::BalanceResponse;
use crate::routes::AppState;

/// Handler for GET /api/v1/balance
///
/// Always 200; an unreadable balance is reported as `"Error"`.
pub async fn get_balance<P>(state: web::Data<AppState<P>>) -> HttpResponse
where
    P: VerificationProviderTrait + 'static,
{
    let balance = state.verification_service.balance().await;
    HttpResponse::Ok().json(ApiResponse::success(BalanceResponse::from(balance)))
}
