//! State-change tracing across model calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::session::state::{CAREER_GOALS, JOB_HISTORY};
use crate::session::SessionState;

use super::agent::BeforeModelHook;

const TRACED_KEYS: [&str; 2] = [JOB_HISTORY, CAREER_GOALS];

/// Detects changes to traced state keys between model calls.
///
/// Snapshots are keyed by session id, so concurrent sessions never see each
/// other's diffs as false positives or negatives.
#[derive(Debug, Default)]
pub struct StateTrace {
    last_seen: Mutex<HashMap<String, HashMap<&'static str, String>>>,
}

impl StateTrace {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record the current fingerprints and return the keys that changed
    /// since the last call for this session.
    pub fn observe(&self, session_id: &str, state: &SessionState) -> Vec<&'static str> {
        let mut last_seen = self.last_seen.lock().expect("trace lock poisoned");
        let snapshot = last_seen.entry(session_id.to_string()).or_default();

        let mut changed = Vec::new();
        for key in TRACED_KEYS {
            let Some(current) = state.fingerprint(key) else {
                continue;
            };
            if snapshot.get(key) != Some(&current) {
                snapshot.insert(key, current);
                changed.push(key);
            }
        }
        changed
    }

    /// Before-model hook logging traced state changes.
    pub fn hook(self: &Arc<Self>) -> BeforeModelHook {
        let trace = Arc::clone(self);
        Arc::new(move |session_id, state, request| {
            debug!(
                session_id,
                messages = request.messages.len(),
                "dispatching model request"
            );
            for key in trace.observe(session_id, state) {
                info!(
                    session_id,
                    key,
                    value = %state.fingerprint(key).unwrap_or_default(),
                    "state changed"
                );
            }
        })
    }
}
