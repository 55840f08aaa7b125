use chatdash_core::event::ActorId;
use chatdash_core::{DashboardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::state::{CloseReason, SessionState};

/// Summary of a finished dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub owner: ActorId,
    pub reason: CloseReason,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    /// Owner interactions that were handled
    pub events_accepted: usize,
    /// Interactions from other users, or for stale controls and forms
    pub events_ignored: usize,
    pub saves_applied: usize,
    pub save_failures: usize,
}

impl SessionReport {
    pub fn duration(&self) -> chrono::Duration {
        self.closed_at - self.opened_at
    }
}

/// Handle to a running dashboard session.
///
/// Dropping the handle does not close the session; it keeps running until
/// it idles out or its event stream ends.
#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    owner: ActorId,
    close: CancellationToken,
    state: watch::Receiver<SessionState>,
    task: JoinHandle<SessionReport>,
}

impl SessionHandle {
    pub(crate) fn new(
        id: Uuid,
        owner: ActorId,
        close: CancellationToken,
        state: watch::Receiver<SessionState>,
        task: JoinHandle<SessionReport>,
    ) -> Self {
        Self {
            id,
            owner,
            close,
            state,
            task,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> &ActorId {
        &self.owner
    }

    /// The most recently published session state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_closed(&self) -> bool {
        self.state().is_closed() || self.task.is_finished()
    }

    /// Asks the session to close. Calling this more than once has no
    /// further effect.
    pub fn close(&self) {
        self.close.cancel();
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Waits until the session has closed.
    ///
    /// # Returns
    ///
    /// The close reason, or `None` if the session task ended without
    /// publishing one.
    pub async fn closed(&self) -> Option<CloseReason> {
        let mut state = self.state.clone();
        let closed = state.wait_for(SessionState::is_closed).await.ok()?;
        match *closed {
            SessionState::Closed { reason } => Some(reason),
            _ => None,
        }
    }

    /// Waits for the session task and returns its report.
    pub async fn join(self) -> Result<SessionReport> {
        self.task
            .await
            .map_err(|e| DashboardError::internal(format!("dashboard session task failed: {e}")))
    }
}
