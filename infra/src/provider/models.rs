//! Wire shapes of the TextVerified API

use serde::Deserialize;

use sv_core::domain::entities::{NumberStatus, OtpMessage};

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountResponse {
    pub current_balance: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateVerificationResponse {
    pub href: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerificationStatusResponse {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub ends_at: Option<String>,
}

impl From<VerificationStatusResponse> for NumberStatus {
    fn from(response: VerificationStatusResponse) -> Self {
        NumberStatus {
            number: response.number.filter(|n| !n.is_empty()),
            ends_at: response.ends_at.filter(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SmsListResponse {
    #[serde(default)]
    pub messages: Option<Vec<SmsMessage>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SmsMessage {
    #[serde(default)]
    pub message: Option<String>,
}

impl SmsListResponse {
    /// Messages in provider order, oldest first
    pub fn into_messages(self) -> Vec<OtpMessage> {
        self.messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| OtpMessage::new(m.message.unwrap_or_default()))
            .collect()
    }
}
