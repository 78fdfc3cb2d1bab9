//! Per-session mutable state shared by tools and callbacks.

use serde_json::{Map, Value};

/// State key for the parsed resume data.
pub const JOB_HISTORY: &str = "job_history";

/// State key for accumulated career goals.
pub const CAREER_GOALS: &str = "career_goals";

/// The mutable mapping shared by all tools and callbacks within one session.
///
/// There is no transaction or locking primitive; callers apply merge
/// semantics explicitly. Mutation is last-writer-wins per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    values: Map<String, Value>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value by key.
    pub fn read(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Write a value under a key, replacing any previous value.
    pub fn write(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Whether parsed resume data exists.
    pub fn has_job_history(&self) -> bool {
        self.values.contains_key(JOB_HISTORY)
    }

    /// The parsed resume data, if any.
    pub fn job_history(&self) -> Option<&Map<String, Value>> {
        self.values.get(JOB_HISTORY).and_then(Value::as_object)
    }

    /// The resume data object, created empty on first access.
    pub fn job_history_mut(&mut self) -> &mut Map<String, Value> {
        self.values
            .entry(JOB_HISTORY.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .expect("job_history is always an object")
    }

    /// The career-goals mapping, if any.
    pub fn career_goals(&self) -> Option<&Map<String, Value>> {
        self.values.get(CAREER_GOALS).and_then(Value::as_object)
    }

    /// The career-goals mapping, created empty on first access.
    pub fn career_goals_mut(&mut self) -> &mut Map<String, Value> {
        self.values
            .entry(CAREER_GOALS.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .expect("career_goals is always an object")
    }

    /// Compact rendering of one key's value, for change tracing.
    pub fn fingerprint(&self, key: &str) -> Option<String> {
        self.values.get(key).map(Value::to_string)
    }
}
