//! In-memory session store.
//!
//! Holds one mutable record per active elicitation session, keyed by the
//! opaque session identifier. Session state is never held as process-wide
//! globals: every handler goes through this store, so multiple concurrent
//! sessions are safe. Expiry is left to the deployment (restart clears all
//! sessions).

use depmap_domain::{Respondent, Session, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Session store error
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// No session exists for the given identifier
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),
}

/// Registry of active sessions
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a session for an accepted respondent and return its id
    pub fn create(&self, respondent: Respondent) -> SessionId {
        let session = Session::new(respondent);
        let id = session.id();
        self.sessions.write().unwrap().insert(id, session);
        id
    }

    /// Run a closure against the session under the write lock.
    ///
    /// Mutations and their derived snapshots happen in one critical
    /// section, so a response never mixes state from two answers.
    pub fn with_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, SessionStoreError> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .get_mut(&id)
            .ok_or(SessionStoreError::UnknownSession(id))?;
        Ok(f(session))
    }

    /// Clone the current state of a session
    pub fn snapshot(&self, id: SessionId) -> Result<Session, SessionStoreError> {
        let sessions = self.sessions.read().unwrap();
        sessions
            .get(&id)
            .cloned()
            .ok_or(SessionStoreError::UnknownSession(id))
    }

    /// Number of active sessions
    pub fn session_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
