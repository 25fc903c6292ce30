use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use sv_core::errors::SessionError;
use sv_shared::types::ApiResponse;

/// Errors returned by route handlers, rendered in the `ApiResponse` envelope
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Verification session {0} not found")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::SessionNotFound(_) => "session_not_found",
            ApiError::Session(SessionError::InvalidRequest { .. }) => "validation_error",
            ApiError::Session(_) => "session_error",
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        ApiError::Validation(fields.join("; "))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::InvalidRequest { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        HttpResponse::build(status).json(ApiResponse::<()>::error(self.code(), self.to_string()))
    }
}
