//! Session storage.

use dashmap::DashMap;
use tabletop_core::{ErrorKind, GameSession, SessionError};
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl StoreError {
    /// HTTP-style status for clients
    pub fn status(&self) -> u16 {
        match self {
            StoreError::SessionNotFound(_) => 404,
            StoreError::Session(e) => match e.kind() {
                ErrorKind::NotFound => 404,
                ErrorKind::Validation => 400,
            },
        }
    }
}

/// Where sessions live between operations.
///
/// A store hands out copies on `load` and overwrites whole sessions on
/// `save`. `apply` runs one operation with exclusive access to a session and
/// only writes the result back when the operation succeeds.
pub trait SessionStore: Send + Sync {
    /// Store a new session under a fresh id
    fn create(&self, session: GameSession) -> SessionId;

    fn load(&self, id: SessionId) -> Result<GameSession, StoreError>;

    /// Overwrite (or insert) a session
    fn save(&self, id: SessionId, session: GameSession);

    fn remove(&self, id: SessionId) -> Result<GameSession, StoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `op` to a session, returning its output and the updated session.
    fn apply<T, F>(&self, id: SessionId, op: F) -> Result<(T, GameSession), StoreError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, SessionError>;
}

/// Sessions held in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    sessions: DashMap<SessionId, GameSession>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemoryStore {
    fn create(&self, session: GameSession) -> SessionId {
        let id = Uuid::new_v4();
        self.sessions.insert(id, session);
        id
    }

    fn load(&self, id: SessionId) -> Result<GameSession, StoreError> {
        self.sessions
            .get(&id)
            .map(|s| s.clone())
            .ok_or(StoreError::SessionNotFound(id))
    }

    fn save(&self, id: SessionId, session: GameSession) {
        self.sessions.insert(id, session);
    }

    fn remove(&self, id: SessionId) -> Result<GameSession, StoreError> {
        self.sessions
            .remove(&id)
            .map(|(_, s)| s)
            .ok_or(StoreError::SessionNotFound(id))
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }

    fn apply<T, F>(&self, id: SessionId, op: F) -> Result<(T, GameSession), StoreError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, SessionError>,
    {
        // The shard lock is held until the entry guard drops
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or(StoreError::SessionNotFound(id))?;

        let mut draft = entry.clone();
        let output = op(&mut draft)?;
        *entry = draft.clone();

        Ok((output, draft))
    }
}
