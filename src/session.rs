//! Server-side session store. Sessions are opaque ids handed to the
//! client in an HttpOnly cookie; everything the session means lives here.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sid";

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// In-memory session store with a fixed expiry window. A session expires
/// `ttl` after creation regardless of activity.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a new session for a user and return its opaque id.
    pub fn create(&self, user_id: i64) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = Session {
            user_id,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.clone(), session);
        session_id
    }

    /// Look up a live session. Expired or unknown ids both come back as
    /// `None`; expired entries are left for `purge_expired` to sweep.
    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .filter(|s| self.is_live(s))
            .cloned()
    }

    /// Destroy a session. Idempotent; destroying an unknown id is fine.
    pub fn destroy(&self, session_id: &str) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id);
    }

    /// Drop all expired sessions, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, s| self.is_live(s));
        before - sessions.len()
    }

    fn is_live(&self, session: &Session) -> bool {
        Utc::now() - session.created_at < self.ttl
    }
}
