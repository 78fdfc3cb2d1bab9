//! Session storage keyed by (app, user, session id).

use std::collections::HashMap;

use tracing::info;

use crate::config::{APP_NAME, DEFAULT_USER_ID};
use crate::session::state::SessionState;
use crate::types::ModelMessage;

/// Session identity: the unit of isolation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub app_id: String,
    pub user_id: String,
    pub session_id: String,
}

/// One isolated conversation: state, ordered history, routing position.
#[derive(Debug, Clone)]
pub struct Session {
    pub key: SessionKey,
    pub state: SessionState,
    /// Append-only turn history.
    pub history: Vec<ModelMessage>,
    /// Name of the agent currently handling turns; `None` routes to the root.
    pub active_agent: Option<String>,
    /// Whether the one-time date annotation has been applied.
    pub date_annotated: bool,
}

impl Session {
    fn new(key: SessionKey) -> Self {
        Self {
            key,
            state: SessionState::new(),
            history: Vec::new(),
            active_agent: None,
            date_annotated: false,
        }
    }
}

/// In-memory store of sessions for one (app, user) scope.
///
/// Sessions are created on first access and never deleted. State in one
/// session is never visible to another.
#[derive(Debug, Default)]
pub struct SessionStore {
    app_id: String,
    user_id: String,
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new(app_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            user_id: user_id.into(),
            sessions: HashMap::new(),
        }
    }

    /// Store scoped to the application defaults.
    pub fn default_scope() -> Self {
        Self::new(APP_NAME, DEFAULT_USER_ID)
    }

    /// Return the existing session, or create a new empty one.
    ///
    /// The boolean is `true` when the session was created by this call.
    /// Lookup faults are treated as "not found": creation is the fallback
    /// path, never a hard failure.
    pub fn get_or_create(&mut self, session_id: &str) -> (&mut Session, bool) {
        let mut created = false;
        let session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                created = true;
                Session::new(SessionKey {
                    app_id: self.app_id.clone(),
                    user_id: self.user_id.clone(),
                    session_id: session_id.to_string(),
                })
            });
        if created {
            info!(session_id, "created new session");
        }
        (session, created)
    }

    /// Get an existing session.
    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// List session ids.
    pub fn session_ids(&self) -> Vec<&str> {
        self.sessions.keys().map(|k| k.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_or_create_creates_then_retrieves() {
        let mut store = SessionStore::default_scope();

        let (session, created) = store.get_or_create("alpha");
        assert!(created);
        assert_eq!(session.key.session_id, "alpha");
        assert_eq!(session.key.app_id, APP_NAME);

        let (_, created) = store.get_or_create("alpha");
        assert!(!created);
    }

    #[test]
    fn sessions_are_isolated() {
        let mut store = SessionStore::default_scope();

        let (a, _) = store.get_or_create("a");
        a.state.write("job_history", json!({"name": "Jane"}));

        let (b, _) = store.get_or_create("b");
        assert!(!b.state.has_job_history());

        assert!(store.get("a").unwrap().state.has_job_history());
    }

    #[test]
    fn new_session_starts_unannotated() {
        let mut store = SessionStore::default_scope();
        let (session, _) = store.get_or_create("s");
        assert!(!session.date_annotated);
        assert!(session.history.is_empty());
        assert!(session.active_agent.is_none());
    }
}
