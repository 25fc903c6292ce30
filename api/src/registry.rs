//! In-memory registry of running verification sessions
//!
//! Each entry owns the session's `SessionHandle`; removing the entry drops
//! the handle, which cancels the session if it is still polling. Finished
//! sessions stay visible for a retention period and are then pruned. Nothing
//! is persisted across restarts.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use sv_core::domain::entities::Balance;
use sv_core::services::{ProgressReporterTrait, SessionEvent, SessionHandle};

use crate::dto::{SessionStatus, SessionView};

/// Progress reporter that remembers the latest event of one session
pub struct SessionProgress {
    service_name: String,
    started_at: DateTime<Utc>,
    state: RwLock<ProgressState>,
}

#[derive(Default)]
struct ProgressState {
    latest: Option<SessionEvent>,
    /// Pre-creation balance, kept once the pending event is superseded
    balance_before: Option<Balance>,
    /// When a terminal event arrived
    finished_at: Option<Instant>,
}

impl SessionProgress {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            started_at: Utc::now(),
            state: RwLock::new(ProgressState::default()),
        }
    }

    /// Render the latest event as a status view
    pub async fn view(&self, session_id: Uuid) -> SessionView {
        let state = self.state.read().await;

        let mut view = SessionView {
            session_id,
            service_name: self.service_name.clone(),
            status: SessionStatus::Started,
            started_at: self.started_at,
            number: None,
            expires_at: None,
            remaining_secs: None,
            balance_before: state.balance_before,
            balance_after: None,
            otp: None,
            failure_reason: None,
            detail: None,
        };

        match state.latest.as_ref() {
            None => {}
            Some(SessionEvent::Pending {
                number,
                balance_after,
                ..
            }) => {
                view.status = SessionStatus::Pending;
                view.number = Some(number.number.clone());
                view.expires_at = Some(number.expires_at);
                view.remaining_secs = Some(number.remaining().num_seconds());
                view.balance_after = Some(*balance_after);
            }
            Some(SessionEvent::Completed {
                number, balance, otp, ..
            }) => {
                view.status = SessionStatus::Completed;
                view.number = Some(number.number.clone());
                view.expires_at = Some(number.expires_at);
                view.remaining_secs = Some(number.remaining().num_seconds());
                view.balance_after = Some(*balance);
                view.otp = Some(otp.to_string());
            }
            Some(SessionEvent::Failed { reason, detail }) => {
                view.status = SessionStatus::Failed;
                view.failure_reason = Some(*reason);
                view.detail = Some(detail.clone());
            }
        }

        view
    }

    /// Time since the session reported its terminal event
    async fn finished_for(&self) -> Option<Duration> {
        self.state.read().await.finished_at.map(|at| at.elapsed())
    }
}

#[async_trait]
impl ProgressReporterTrait for SessionProgress {
    async fn report(&self, event: SessionEvent) {
        let mut state = self.state.write().await;
        if let SessionEvent::Pending { balance_before, .. } = &event {
            state.balance_before = Some(*balance_before);
        }
        if event.is_terminal() {
            state.finished_at = Some(Instant::now());
        }
        state.latest = Some(event);
    }
}

struct SessionEntry {
    /// Dropping the handle cancels the session
    handle: SessionHandle,
    progress: Arc<SessionProgress>,
}

/// How long a finished session stays queryable by default
pub const DEFAULT_SESSION_RETENTION: Duration = Duration::from_secs(600);

/// Sessions started through the HTTP API
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    retention: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_retention(DEFAULT_SESSION_RETENTION)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            retention,
        }
    }

    /// Register a session. Finished sessions past their retention are
    /// pruned first.
    pub async fn insert(&self, handle: SessionHandle, progress: Arc<SessionProgress>) -> Uuid {
        self.prune().await;

        let id = handle.id();
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                handle,
                progress,
            },
        );
        id
    }

    /// Drop finished sessions older than the retention period. A task that
    /// ended without a terminal event (it panicked) is dropped right away.
    /// Returns how many entries were removed.
    pub async fn prune(&self) -> usize {
        let mut sessions = self.sessions.write().await;

        let mut expired = Vec::new();
        for (id, entry) in sessions.iter() {
            let evict = match entry.progress.finished_for().await {
                Some(elapsed) => elapsed >= self.retention,
                None => entry.handle.is_finished(),
            };
            if evict {
                expired.push(*id);
            }
        }

        for id in &expired {
            sessions.remove(id);
        }
        if !expired.is_empty() {
            tracing::debug!(
                evicted = expired.len(),
                remaining = sessions.len(),
                event = "sessions_pruned",
                "Pruned finished verification sessions"
            );
        }
        expired.len()
    }

    pub async fn view(&self, id: Uuid) -> Option<SessionView> {
        let progress = {
            let sessions = self.sessions.read().await;
            sessions.get(&id).map(|entry| entry.progress.clone())
        };
        match progress {
            Some(progress) => Some(progress.view(id).await),
            None => None,
        }
    }

    /// Forget a session, cancelling it if it is still running.
    /// Returns false if the id is unknown.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(entry) => {
                if !entry.handle.is_finished() {
                    tracing::info!(session_id = %id, event = "session_abandoned", "Cancelling verification session");
                }
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
