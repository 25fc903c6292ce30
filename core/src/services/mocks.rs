//! Scripted provider and recording reporter shared by service tests

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::entities::{NumberStatus, OtpMessage, VerificationHandle, VerificationRequest};
use crate::errors::ProviderCallError;
use crate::services::verification::{
    AuthenticatorTrait, ProgressReporterTrait, SessionEvent, VerificationProviderTrait,
};

pub fn network_error() -> ProviderCallError {
    ProviderCallError::Network("connection reset".to_string())
}

pub fn unauthorized() -> ProviderCallError {
    ProviderCallError::Unauthorized {
        status: 401,
        body: "{\"error\":\"token expired\"}".to_string(),
    }
}

/// Number status that carries a usable assignment
pub fn assigned_status(number: &str) -> NumberStatus {
    NumberStatus {
        number: Some(number.to_string()),
        ends_at: Some("2030-01-01T00:15:00Z".to_string()),
    }
}

/// Provider whose responses are popped from per-operation queues.
/// An empty queue falls back to a benign default.
#[derive(Default)]
pub struct MockProvider {
    pub auth_script: Mutex<VecDeque<Result<String, ProviderCallError>>>,
    pub balance_script: Mutex<VecDeque<Result<f64, ProviderCallError>>>,
    pub create_script: Mutex<VecDeque<Result<VerificationHandle, ProviderCallError>>>,
    pub status_script: Mutex<HashMap<String, VecDeque<Result<NumberStatus, ProviderCallError>>>>,
    pub sms_script: Mutex<HashMap<String, VecDeque<Result<Vec<OtpMessage>, ProviderCallError>>>>,
    /// Delay applied to every handshake
    pub auth_delay: Mutex<Option<Duration>>,

    pub auth_calls: AtomicU32,
    pub balance_calls: AtomicU32,
    pub create_calls: AtomicU32,
    pub status_calls: AtomicU32,
    pub sms_calls: AtomicU32,
    /// Bearer tokens presented on authenticated calls, in order
    pub tokens_seen: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_auth(&self, result: Result<String, ProviderCallError>) {
        self.auth_script.lock().unwrap().push_back(result);
    }

    pub fn push_balance(&self, result: Result<f64, ProviderCallError>) {
        self.balance_script.lock().unwrap().push_back(result);
    }

    pub fn push_create(&self, result: Result<VerificationHandle, ProviderCallError>) {
        self.create_script.lock().unwrap().push_back(result);
    }

    pub fn push_status(&self, id: &str, result: Result<NumberStatus, ProviderCallError>) {
        self.status_script
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn push_sms(&self, id: &str, result: Result<Vec<OtpMessage>, ProviderCallError>) {
        self.sms_script
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn set_auth_delay(&self, delay: Duration) {
        *self.auth_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }

    fn record_token(&self, token: &str) {
        self.tokens_seen.lock().unwrap().push(token.to_string());
    }
}

#[async_trait]
impl AuthenticatorTrait for MockProvider {
    async fn authenticate(&self) -> Result<String, ProviderCallError> {
        let n = self.auth_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = *self.auth_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.auth_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(format!("token-{}", n)))
    }
}

#[async_trait]
impl VerificationProviderTrait for MockProvider {
    async fn account_balance(&self, token: &str) -> Result<f64, ProviderCallError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(token);
        let scripted = self.balance_script.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(10.0))
    }

    async fn create_verification(
        &self,
        token: &str,
        _request: &VerificationRequest,
    ) -> Result<VerificationHandle, ProviderCallError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.record_token(token);
        let scripted = self.create_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(VerificationHandle {
                id: format!("R{}", n),
                status_href: format!("https://provider.test/verifications/R{}", n),
            })
        })
    }

    async fn verification_status(
        &self,
        token: &str,
        handle: &VerificationHandle,
    ) -> Result<NumberStatus, ProviderCallError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(token);
        let scripted = self
            .status_script
            .lock()
            .unwrap()
            .get_mut(&handle.id)
            .and_then(|queue| queue.pop_front());
        scripted.unwrap_or_else(|| Ok(NumberStatus::default()))
    }

    async fn sms_messages(
        &self,
        token: &str,
        verification_id: &str,
    ) -> Result<Vec<OtpMessage>, ProviderCallError> {
        self.sms_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(token);
        let scripted = self
            .sms_script
            .lock()
            .unwrap()
            .get_mut(verification_id)
            .and_then(|queue| queue.pop_front());
        scripted.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Reporter that keeps every event it receives
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<SessionEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressReporterTrait for RecordingReporter {
    async fn report(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}
