//! Integration tests for the verification session routes

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use sv_api::app::{configure, not_found};
use sv_api::routes::AppState;
use sv_core::domain::entities::{NumberStatus, OtpMessage, VerificationHandle};
use sv_core::services::RetryPolicy;
use sv_core::{
    AuthenticatorTrait, ProviderCallError, VerificationProviderTrait, VerificationRequest,
    VerificationService, VerificationServiceConfig,
};

/// Provider that assigns a number immediately (unless told not to) and
/// delivers one SMS
struct StubProvider {
    assign_number: bool,
    status_calls: AtomicU32,
}

impl StubProvider {
    fn new(assign_number: bool) -> Self {
        Self {
            assign_number,
            status_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl AuthenticatorTrait for StubProvider {
    async fn authenticate(&self) -> Result<String, ProviderCallError> {
        Ok("stub-token".to_string())
    }
}

#[async_trait]
impl VerificationProviderTrait for StubProvider {
    async fn account_balance(&self, _token: &str) -> Result<f64, ProviderCallError> {
        Ok(12.5)
    }

    async fn create_verification(
        &self,
        _token: &str,
        _request: &VerificationRequest,
    ) -> Result<VerificationHandle, ProviderCallError> {
        Ok(VerificationHandle {
            id: "R1".to_string(),
            status_href: "https://provider.test/verifications/R1".to_string(),
        })
    }

    async fn verification_status(
        &self,
        _token: &str,
        _handle: &VerificationHandle,
    ) -> Result<NumberStatus, ProviderCallError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.assign_number {
            return Ok(NumberStatus::default());
        }
        Ok(NumberStatus {
            number: Some("+15551234567".to_string()),
            ends_at: Some("2099-01-01T00:00:00Z".to_string()),
        })
    }

    async fn sms_messages(
        &self,
        _token: &str,
        _verification_id: &str,
    ) -> Result<Vec<OtpMessage>, ProviderCallError> {
        Ok(vec![OtpMessage::new("Your code is 9021")])
    }
}

fn fast_config() -> VerificationServiceConfig {
    VerificationServiceConfig {
        number_poll_interval: Duration::from_millis(10),
        number_wait_window: Duration::from_secs(30),
        otp_poll_interval: Duration::from_millis(10),
        otp_wait_window: Duration::from_secs(30),
        otp_failure_cooldown: Duration::from_millis(10),
        retry: RetryPolicy::new(3, Duration::from_millis(10)),
    }
}

fn state_for(provider: Arc<StubProvider>) -> web::Data<AppState<StubProvider>> {
    let service = Arc::new(VerificationService::new(provider, fast_config()));
    web::Data::new(AppState::new(service))
}

/// State whose registry evicts finished sessions at the first chance
fn evicting_state_for(provider: Arc<StubProvider>) -> web::Data<AppState<StubProvider>> {
    let service = Arc::new(VerificationService::new(provider, fast_config()));
    web::Data::new(AppState::with_session_retention(service, Duration::ZERO))
}

macro_rules! start_session {
    ($app:expr, $service_name:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/verifications")
            .set_json(json!({ "service_name": $service_name }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["data"]["session_id"].as_str().unwrap().to_string()
    }};
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(configure::<StubProvider>)
                .default_service(web::route().to(not_found)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_check() {
    let state = state_for(Arc::new(StubProvider::new(true)));
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
}

#[actix_web::test]
async fn test_start_rejects_invalid_service_name() {
    let state = state_for(Arc::new(StubProvider::new(true)));
    let app = init_app!(state);

    for name in ["", "   "] {
        let req = test::TestRequest::post()
            .uri("/api/v1/verifications")
            .set_json(json!({ "service_name": name }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "service name {:?}", name);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "validation_error");
    }
    assert!(state.sessions.is_empty().await);
}

#[actix_web::test]
async fn test_session_runs_to_completion() {
    let state = state_for(Arc::new(StubProvider::new(true)));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/verifications")
        .set_json(json!({ "service_name": "whatsapp" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 202);
    let body: Value = test::read_body_json(resp).await;
    let session_id = body["data"]["session_id"].as_str().unwrap().to_string();

    let mut view = Value::Null;
    for _ in 0..200 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/verifications/{}", session_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        view = body["data"].clone();
        if view["status"] == "completed" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(view["status"], "completed");
    assert_eq!(view["service_name"], "whatsapp");
    assert_eq!(view["number"], "+15551234567");
    assert_eq!(view["otp"], "9021");
    assert_eq!(view["balance_before"], 12.5);
    assert_eq!(view["balance_after"], 12.5);
}

#[actix_web::test]
async fn test_unknown_session_is_not_found() {
    let state = state_for(Arc::new(StubProvider::new(true)));
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/verifications/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_code"], "session_not_found");

    let req = test::TestRequest::get()
        .uri("/api/v1/verifications/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_cancel_stops_polling_and_forgets_session() {
    let provider = Arc::new(StubProvider::new(false));
    let state = state_for(provider.clone());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/verifications")
        .set_json(json!({ "service_name": "telegram" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let session_id = body["data"]["session_id"].as_str().unwrap().to_string();

    tokio::time::sleep(Duration::from_millis(50)).await;
    let uri = format!("/api/v1/verifications/{}", session_id);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "started");

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    tokio::time::sleep(Duration::from_millis(20)).await;
    let polls = provider.status_calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(provider.status_calls.load(Ordering::SeqCst), polls);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_balance_endpoint() {
    let state = state_for(Arc::new(StubProvider::new(true)));
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/v1/balance").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["balance"], 12.5);
    assert_eq!(body["data"]["display"], "12.50");
}

#[actix_web::test]
async fn test_unknown_route_uses_envelope() {
    let state = state_for(Arc::new(StubProvider::new(true)));
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/v2/nothing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_code"], "not_found");
}

#[actix_web::test]
async fn test_finished_sessions_are_evicted() {
    let state = evicting_state_for(Arc::new(StubProvider::new(true)));
    let app = init_app!(state);

    let first = start_session!(app, "whatsapp");
    let first_uri = format!("/api/v1/verifications/{}", first);
    let mut status = Value::Null;
    for _ in 0..200 {
        let req = test::TestRequest::get().uri(&first_uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        status = body["data"]["status"].clone();
        if status == "completed" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status, "completed");

    // Starting another session prunes the finished one
    let second = start_session!(app, "telegram");
    assert_eq!(state.sessions.len().await, 1);

    let req = test::TestRequest::get().uri(&first_uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/verifications/{}", second))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // A burst of sessions does not accumulate once they finish
    for _ in 0..5 {
        start_session!(app, "signal");
    }
    for _ in 0..200 {
        state.sessions.prune().await;
        if state.sessions.is_empty().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(state.sessions.is_empty().await);
}

#[actix_web::test]
async fn test_running_sessions_are_not_evicted() {
    let state = evicting_state_for(Arc::new(StubProvider::new(false)));
    let app = init_app!(state);

    start_session!(app, "whatsapp");
    tokio::time::sleep(Duration::from_millis(50)).await;
    start_session!(app, "telegram");

    assert_eq!(state.sessions.prune().await, 0);
    assert_eq!(state.sessions.len().await, 2);
}
