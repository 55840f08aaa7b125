use std::collections::HashMap;
use std::sync::Arc;

use chatdash_core::event::ActorId;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::handle::{SessionHandle, SessionReport};

/// Tracks every dashboard a process has open.
///
/// Sessions run independently; the registry only keeps their handles so
/// they can be listed, closed and reaped together.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session handle.
    ///
    /// # Returns
    ///
    /// The session id the handle is stored under.
    pub async fn insert(&self, handle: SessionHandle) -> Uuid {
        let id = handle.id();
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, handle);
        id
    }

    /// Removes a session handle without closing the session.
    pub async fn remove(&self, session_id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&session_id)
    }

    pub async fn contains(&self, session_id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Ids of the still-open sessions owned by `owner`.
    pub async fn open_for(&self, owner: &ActorId) -> Vec<Uuid> {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|h| h.owner() == owner && !h.is_closed())
            .map(SessionHandle::id)
            .collect()
    }

    /// Asks one session to close.
    ///
    /// # Returns
    ///
    /// `true` if the session is registered.
    pub async fn close(&self, session_id: Uuid) -> bool {
        let sessions = self.sessions.read().await;
        match sessions.get(&session_id) {
            Some(handle) => {
                handle.close();
                true
            }
            None => false,
        }
    }

    /// Removes every closed session and collects its report.
    pub async fn reap(&self) -> Vec<SessionReport> {
        let closed: Vec<SessionHandle> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, h)| h.is_closed())
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };
        Self::join_all(closed).await
    }

    /// Closes every session and waits for all of them to finish.
    pub async fn shutdown(&self) -> Vec<SessionReport> {
        let handles: Vec<SessionHandle> = {
            let mut sessions = self.sessions.write().await;
            sessions.drain().map(|(_, h)| h).collect()
        };
        tracing::info!(sessions = handles.len(), "[Registry] Closing all dashboards");
        for handle in &handles {
            handle.close();
        }
        Self::join_all(handles).await
    }

    async fn join_all(handles: Vec<SessionHandle>) -> Vec<SessionReport> {
        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            let id = handle.id();
            match handle.join().await {
                Ok(report) => reports.push(report),
                Err(e) => tracing::warn!(session = %id, error = %e, "[Registry] Session did not finish cleanly"),
            }
        }
        reports
    }
}
