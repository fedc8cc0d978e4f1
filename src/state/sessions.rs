//! Session index: live transport connections and their user ids.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parlor_proto::UserId;

/// Identifies one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Bidirectional session <-> user map.
///
/// Both directions are mutated only through `open` and `close`, so they can
/// never disagree for longer than one call.
#[derive(Debug, Default)]
pub struct SessionIndex {
    next: AtomicU64,
    users_by_session: DashMap<SessionId, UserId>,
    sessions_by_user: DashMap<UserId, SessionId>,
}

impl SessionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a session id for a fresh connection and bind it to `user`.
    pub fn open(&self, user: UserId) -> SessionId {
        let session = SessionId(self.next.fetch_add(1, Ordering::Relaxed));
        self.users_by_session.insert(session, user);
        self.sessions_by_user.insert(user, session);
        session
    }

    /// Drop both directions of the binding. Returns the user the session
    /// belonged to, if it was still bound.
    pub fn close(&self, session: SessionId) -> Option<UserId> {
        let (_, user) = self.users_by_session.remove(&session)?;
        self.sessions_by_user.remove(&user);
        Some(user)
    }

    pub fn user_for(&self, session: SessionId) -> Option<UserId> {
        self.users_by_session.get(&session).map(|entry| *entry)
    }

    pub fn session_for(&self, user: UserId) -> Option<SessionId> {
        self.sessions_by_user.get(&user).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.users_by_session.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users_by_session.is_empty()
    }
}
