use std::sync::Arc;

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use sv_core::services::{VerificationProviderTrait, VerificationService};
use sv_shared::types::ApiResponse;

use crate::dto::{StartVerificationRequest, StartVerificationResponse};
use crate::handlers::ApiError;
use crate::registry::SessionProgress;
use crate::routes::AppState;

/// Handler for POST /api/v1/verifications
///
/// Starts a session in the background and returns its id right away.
///
/// # Request Body
///
/// ```json
/// { "service_name": "whatsapp" }
/// ```
///
/// # Response
///
/// `202 Accepted` with `{ "session_id": "...", "service_name": "whatsapp" }`
pub async fn start_verification<P>(
    state: web::Data<AppState<P>>,
    request: web::Json<StartVerificationRequest>,
) -> Result<HttpResponse, ApiError>
where
    P: VerificationProviderTrait + 'static,
{
    request.validate()?;
    let request = VerificationService::<P>::build_request(&request.service_name)?;
    let service_name = request.service_name.clone();

    let progress = Arc::new(SessionProgress::new(service_name.clone()));
    let handle = state
        .verification_service
        .spawn(request, progress.clone());
    let session_id = state.sessions.insert(handle, progress).await;

    tracing::info!(
        session_id = %session_id,
        service_name = %service_name,
        event = "session_requested",
        "Verification session requested"
    );

    Ok(HttpResponse::Accepted().json(ApiResponse::success(StartVerificationResponse {
        session_id,
        service_name,
    })))
}

/// Handler for GET /api/v1/verifications/{id}
pub async fn get_verification<P>(
    state: web::Data<AppState<P>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError>
where
    P: VerificationProviderTrait + 'static,
{
    let id = path.into_inner();
    let view = state
        .sessions
        .view(id)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// Handler for DELETE /api/v1/verifications/{id}
///
/// Cancels the session if it is still running and forgets it.
pub async fn cancel_verification<P>(
    state: web::Data<AppState<P>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError>
where
    P: VerificationProviderTrait + 'static,
{
    let id = path.into_inner();
    if !state.sessions.remove(id).await {
        return Err(ApiError::SessionNotFound(id));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "session_id": id }))))
}
