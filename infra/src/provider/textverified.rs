//! TextVerified API client
//!
//! Implements the core provider seam over HTTP. Each method is one request;
//! status codes and body shapes are mapped onto `ProviderCallError` so the
//! core can decide what to retry.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;

use sv_core::domain::entities::{NumberStatus, OtpMessage, VerificationHandle, VerificationRequest};
use sv_core::errors::ProviderCallError;
use sv_core::services::{AuthenticatorTrait, VerificationProviderTrait};

use super::config::TextVerifiedConfig;
use super::models::{
    AccountResponse, AuthResponse, CreateVerificationResponse, SmsListResponse,
    VerificationStatusResponse,
};
use crate::http::{HttpClient, HttpError, HttpResponse};
use crate::InfrastructureError;

const API_KEY_HEADER: &str = "x-api-key";
const API_USERNAME_HEADER: &str = "x-api-username";

/// TextVerified provider client
pub struct TextVerifiedClient {
    http: HttpClient,
    config: TextVerifiedConfig,
    /// Handshake headers, validated once at construction
    identity: HeaderMap,
}

impl TextVerifiedClient {
    pub fn new(config: TextVerifiedConfig) -> Result<Self, InfrastructureError> {
        let http = HttpClient::new()?;

        let mut identity = HeaderMap::new();
        for (name, value) in [
            (API_KEY_HEADER, &config.api_key),
            (API_USERNAME_HEADER, &config.username),
        ] {
            let value = HeaderValue::from_str(value).map_err(|_| {
                InfrastructureError::Config(format!("{} is not a valid header value", name))
            })?;
            identity.insert(name, value);
        }

        tracing::info!(
            base_url = %config.base_url,
            request_timeout_secs = config.request_timeout_secs,
            "TextVerified client initialized"
        );

        Ok(Self {
            http,
            config,
            identity,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let config = TextVerifiedConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &TextVerifiedConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn bearer_headers(token: &str) -> Result<HeaderMap, ProviderCallError> {
        let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ProviderCallError::Malformed {
                reason: "token is not a valid header value".to_string(),
                body: String::new(),
            }
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpResponse, ProviderCallError> {
        self.http
            .call(method, url, headers, body, self.config.request_timeout())
            .await
            .map_err(map_http_error)
    }
}

/// 401/403 mean the token (or identity) was rejected; any other status is a
/// plain rejection.
fn map_http_error(err: HttpError) -> ProviderCallError {
    match err {
        HttpError::Timeout(_) | HttpError::Transport(_) => ProviderCallError::Network(err.to_string()),
        HttpError::Status { status, body } if status == 401 || status == 403 => {
            ProviderCallError::Unauthorized { status, body }
        }
        HttpError::Status { status, body } => ProviderCallError::Rejected { status, body },
    }
}

fn parse<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ProviderCallError> {
    response.json().map_err(|err| ProviderCallError::Malformed {
        reason: err.to_string(),
        body: response.body.clone(),
    })
}

fn malformed(reason: &str, response: &HttpResponse) -> ProviderCallError {
    ProviderCallError::Malformed {
        reason: reason.to_string(),
        body: response.body.clone(),
    }
}

#[async_trait]
impl AuthenticatorTrait for TextVerifiedClient {
    async fn authenticate(&self) -> Result<String, ProviderCallError> {
        let response = self
            .send(Method::POST, &self.url("/auth"), &self.identity, None)
            .await?;

        let auth: AuthResponse = parse(&response)?;
        match auth.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(malformed("missing token", &response)),
        }
    }
}

#[async_trait]
impl VerificationProviderTrait for TextVerifiedClient {
    async fn account_balance(&self, token: &str) -> Result<f64, ProviderCallError> {
        let headers = Self::bearer_headers(token)?;
        let response = self
            .send(Method::GET, &self.url("/account/me"), &headers, None)
            .await?;

        let account: AccountResponse = parse(&response)?;
        account
            .current_balance
            .ok_or_else(|| malformed("missing currentBalance", &response))
    }

    async fn create_verification(
        &self,
        token: &str,
        request: &VerificationRequest,
    ) -> Result<VerificationHandle, ProviderCallError> {
        let headers = Self::bearer_headers(token)?;
        let body = serde_json::to_value(request).map_err(|err| ProviderCallError::Malformed {
            reason: err.to_string(),
            body: String::new(),
        })?;

        let response = self
            .send(Method::POST, &self.url("/verifications"), &headers, Some(&body))
            .await?;

        if response.is_empty() {
            return Err(malformed("empty body", &response));
        }

        let created: CreateVerificationResponse = parse(&response)?;
        let href = created
            .href
            .filter(|href| !href.is_empty())
            .ok_or_else(|| malformed("missing href", &response))?;
        let id = created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| malformed("missing id", &response))?;

        Ok(VerificationHandle {
            id,
            status_href: href,
        })
    }

    async fn verification_status(
        &self,
        token: &str,
        handle: &VerificationHandle,
    ) -> Result<NumberStatus, ProviderCallError> {
        let headers = Self::bearer_headers(token)?;
        let response = self
            .send(Method::GET, &handle.status_href, &headers, None)
            .await?;

        let status: VerificationStatusResponse = parse(&response)?;
        Ok(status.into())
    }

    async fn sms_messages(
        &self,
        token: &str,
        verification_id: &str,
    ) -> Result<Vec<OtpMessage>, ProviderCallError> {
        let headers = Self::bearer_headers(token)?;
        let url = reqwest::Url::parse_with_params(
            &self.url("/sms"),
            &[("ReservationId", verification_id)],
        )
        .map_err(|err| ProviderCallError::Network(format!("invalid SMS URL: {}", err)))?;

        let response = self
            .send(Method::GET, url.as_str(), &headers, None)
            .await?;

        let list: SmsListResponse = parse(&response)?;
        Ok(list.into_messages())
    }
}
