//! Single verification session state machine
//!
//! AUTHENTICATING -> CREATING -> AWAITING_NUMBER -> AWAITING_OTP -> COMPLETED,
//! with FAILED reachable from every non-terminal state. Every provider call
//! and every sleep races the session's cancellation token.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use sv_shared::utils::phone::mask_phone_number;

use crate::domain::entities::{
    AssignedNumber, Credential, OtpCode, SessionState, VerificationHandle,
    VerificationRequest, VerificationSession,
};
use crate::errors::{SessionError, SessionResult, WaitPhase};
use crate::services::balance::BalanceReader;
use crate::services::token::TokenCache;

use super::config::VerificationServiceConfig;
use super::traits::{ProgressReporterTrait, VerificationProviderTrait};
use super::types::{SessionEvent, SessionSummary};

/// Drives one session from start to a terminal state
pub(crate) struct SessionRunner<'a, P: VerificationProviderTrait> {
    pub provider: &'a P,
    pub tokens: &'a TokenCache<P>,
    pub balances: &'a BalanceReader<P>,
    pub config: &'a VerificationServiceConfig,
    pub reporter: &'a dyn ProgressReporterTrait,
    pub cancel: &'a CancellationToken,
}

impl<'a, P: VerificationProviderTrait> SessionRunner<'a, P> {
    /// Run the session to completion. Failures other than cancellation are
    /// reported to the progress reporter before being returned.
    pub async fn run(&self, id: Uuid, request: VerificationRequest) -> SessionResult<SessionSummary> {
        let mut session = VerificationSession::with_id(id, request);

        tracing::info!(
            session_id = %session.id,
            service_name = %session.request.service_name,
            event = "session_started",
            "Starting verification session"
        );

        let result = self.drive(&mut session).await;

        match &result {
            Ok(summary) => {
                tracing::info!(
                    session_id = %session.id,
                    number = %mask_phone_number(&summary.number.number),
                    otp_found = summary.otp.as_code().is_some(),
                    event = "session_completed",
                    "Verification session completed"
                );
            }
            Err(SessionError::Cancelled) => {
                tracing::info!(
                    session_id = %session.id,
                    state = %session.state(),
                    event = "session_cancelled",
                    "Verification session cancelled"
                );
            }
            Err(err) => {
                tracing::error!(
                    session_id = %session.id,
                    state = %session.state(),
                    reason = ?err.reason(),
                    error = %err,
                    event = "session_failed",
                    "Verification session failed"
                );
                if !session.state().is_terminal() {
                    let _ = session.advance(SessionState::Failed);
                }
                self.reporter
                    .report(SessionEvent::Failed {
                        reason: err.reason(),
                        detail: err.detail(),
                    })
                    .await;
            }
        }

        result
    }

    async fn drive(&self, session: &mut VerificationSession) -> SessionResult<SessionSummary> {
        self.token().await?;
        session.advance(SessionState::Creating)?;

        let balance_before = self.guard(self.balances.get_balance()).await?;
        session.balance_before = Some(balance_before);

        let handle = self.create(session).await?;
        session.set_handle(handle.clone())?;

        let balance_after = self.guard(self.balances.get_balance()).await?;
        session.balance_after = Some(balance_after);
        session.advance(SessionState::AwaitingNumber)?;

        let number = self.await_number(session.id, &handle).await?;
        session.assign_number(number.clone())?;
        session.advance(SessionState::AwaitingOtp)?;

        self.reporter
            .report(SessionEvent::Pending {
                service_name: session.request.service_name.clone(),
                number: number.clone(),
                balance_before,
                balance_after,
            })
            .await;

        let otp = self.await_otp(session.id, &handle).await?;
        session.set_otp(otp.clone())?;
        session.advance(SessionState::Completed)?;

        self.reporter
            .report(SessionEvent::Completed {
                service_name: session.request.service_name.clone(),
                number: number.clone(),
                balance: balance_after,
                otp: otp.clone(),
            })
            .await;

        Ok(SessionSummary {
            session_id: session.id,
            service_name: session.request.service_name.clone(),
            handle,
            number,
            otp,
            balance_before,
            balance_after,
        })
    }

    /// Creation is a single attempt; a retry could open a second billable
    /// verification.
    async fn create(&self, session: &VerificationSession) -> SessionResult<VerificationHandle> {
        let credential = self.token().await?;

        let result = self
            .guard(self.provider.create_verification(credential.token(), &session.request))
            .await?;

        match result {
            Ok(handle) => {
                tracing::info!(
                    session_id = %session.id,
                    verification_id = %handle.id,
                    event = "verification_created",
                    "Verification created"
                );
                Ok(handle)
            }
            Err(err) => {
                if err.is_unauthorized() {
                    self.tokens.invalidate(&credential).await;
                }
                Err(SessionError::Provider {
                    message: err.to_string(),
                    payload: err.payload().map(str::to_string),
                })
            }
        }
    }

    async fn await_number(
        &self,
        session_id: Uuid,
        handle: &VerificationHandle,
    ) -> SessionResult<AssignedNumber> {
        let window = self.config.number_wait_window;
        let deadline = Instant::now() + window;
        let mut attempt = 0u32;

        while Instant::now() < deadline {
            attempt += 1;
            let credential = self.token().await?;

            match self
                .guard(self.provider.verification_status(credential.token(), handle))
                .await?
            {
                Ok(status) => {
                    if let Some(number) = status.into_assigned() {
                        tracing::info!(
                            session_id = %session_id,
                            number = %mask_phone_number(&number.number),
                            expires_at = %number.expires_at,
                            attempt,
                            event = "number_assigned",
                            "Number assigned"
                        );
                        return Ok(number);
                    }
                    tracing::debug!(session_id = %session_id, attempt, "Number not assigned yet");
                }
                Err(err) => {
                    if err.is_unauthorized() {
                        self.tokens.invalidate(&credential).await;
                    }
                    tracing::warn!(
                        session_id = %session_id,
                        attempt,
                        error = %err,
                        event = "number_poll_failed",
                        "Number status poll failed"
                    );
                }
            }

            self.pause(self.config.number_poll_interval).await?;
        }

        Err(SessionError::Timeout {
            phase: WaitPhase::Number,
            window,
        })
    }

    async fn await_otp(&self, session_id: Uuid, handle: &VerificationHandle) -> SessionResult<OtpCode> {
        let window = self.config.otp_wait_window;
        let deadline = Instant::now() + window;
        let mut attempt = 0u32;

        while Instant::now() < deadline {
            attempt += 1;
            let credential = self.token().await?;

            match self
                .guard(self.provider.sms_messages(credential.token(), &handle.id))
                .await?
            {
                Ok(messages) => {
                    if let Some(latest) = messages.last() {
                        let otp = OtpCode::from_message(latest);
                        tracing::info!(
                            session_id = %session_id,
                            attempt,
                            otp_found = otp.as_code().is_some(),
                            event = "sms_received",
                            "SMS received"
                        );
                        return Ok(otp);
                    }
                    tracing::debug!(session_id = %session_id, attempt, "No SMS yet");
                }
                Err(err) => {
                    if err.is_unauthorized() {
                        self.tokens.invalidate(&credential).await;
                    }
                    tracing::warn!(
                        session_id = %session_id,
                        attempt,
                        error = %err,
                        event = "sms_poll_failed",
                        "SMS poll failed"
                    );
                    self.pause(self.config.otp_failure_cooldown).await?;
                }
            }

            self.pause(self.config.otp_poll_interval).await?;
        }

        Err(SessionError::Timeout {
            phase: WaitPhase::Otp,
            window,
        })
    }

    /// Token from the shared cache; exhaustion is fatal to the session
    async fn token(&self) -> SessionResult<Credential> {
        Ok(self.guard(self.tokens.get_token()).await??)
    }

    async fn guard<T>(&self, future: impl Future<Output = T>) -> SessionResult<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SessionError::Cancelled),
            value = future => Ok(value),
        }
    }

    async fn pause(&self, duration: Duration) -> SessionResult<()> {
        self.guard(tokio::time::sleep(duration)).await
    }
}

