//! Handle to a spawned verification session

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::errors::{SessionError, SessionResult};

use super::types::SessionSummary;

/// Owner of a background session. Dropping it without `join` cancels the
/// session.
pub struct SessionHandle {
    id: Uuid,
    cancel: CancellationToken,
    task: Option<JoinHandle<SessionResult<SessionSummary>>>,
}

impl SessionHandle {
    pub(crate) fn new(
        id: Uuid,
        cancel: CancellationToken,
        task: JoinHandle<SessionResult<SessionSummary>>,
    ) -> Self {
        Self {
            id,
            cancel,
            task: Some(task),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ask the session to stop at its next suspension point
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait for the session outcome. Dropping the returned future before it
    /// resolves cancels the session like dropping the handle does.
    pub async fn join(mut self) -> SessionResult<SessionSummary> {
        let Some(task) = self.task.as_mut() else {
            return Err(SessionError::Cancelled);
        };

        let outcome = task.await;
        self.task = None;

        match outcome {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(SessionError::Cancelled),
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("finished", &self.is_finished())
            .finish()
    }
}
