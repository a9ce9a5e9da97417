use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::models::resume::ResumeDocument;
use crate::sync::engine::SyncEngine;

/// One open conversation: the user it belongs to and the engine owning its
/// document.
#[derive(Debug)]
pub struct Session {
    pub user_id: Uuid,
    pub engine: SyncEngine,
}

/// The per-session mutex is what makes each engine single-writer: a batch of
/// events is applied to completion before the next request touches the session.
pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(
        &self,
        user_id: Uuid,
        initial: Option<ResumeDocument>,
    ) -> (Uuid, SessionHandle) {
        let engine = initial.map(SyncEngine::new).unwrap_or_default();
        let session_id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Session { user_id, engine }));
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, Arc::clone(&handle));
        info!(
            "Opened session {session_id} for user {user_id} ({} open)",
            sessions.len()
        );
        (session_id, handle)
    }

    pub async fn get(&self, session_id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    /// Drops the session. Events still in flight for it are never applied.
    pub async fn close(&self, session_id: Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&session_id).is_some();
        if removed {
            info!("Closed session {session_id} ({} open)", sessions.len());
        }
        removed
    }
}
