//! Tool trait, execution context, and the typed outcome contract.

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::ModelProvider;
use crate::session::SessionState;

/// Context available during tool execution.
///
/// Borrows the owning session's state for the duration of one call; the
/// provider handle is available for tools that delegate work to the model
/// (resume extraction).
pub struct ToolContext<'a> {
    pub session_id: &'a str,
    pub state: &'a mut SessionState,
    pub provider: &'a dyn ModelProvider,
}

/// Arguments passed to a tool, as sent by the model.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments(Value);

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// A required string argument, or `None` when absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// How a tool call went, before flattening to conversation text.
///
/// Tools never return `Err` for semantic faults: every outcome becomes a
/// string the model can react to. The kind survives long enough to be
/// logged and asserted on, separating "tool semantically failed" from
/// "tool had a bug".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcomeKind {
    Ok,
    Error,
}

/// Typed result of a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub kind: ToolOutcomeKind,
    pub message: String,
}

impl ToolOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            kind: ToolOutcomeKind::Ok,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToolOutcomeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToolOutcomeKind::Error
    }

    /// Flatten to the conversational string handed back to the model.
    pub fn into_text(self) -> String {
        self.message
    }
}

/// Core tool trait: a callable action over session state.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> ToolParameters;

    /// Execute the tool against the session.
    async fn execute(&self, args: &ToolArguments, ctx: &mut ToolContext<'_>) -> ToolOutcome;
}

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone)]
pub struct ToolParameters {
    pub schema: Value,
}

impl ToolParameters {
    /// Builder: create an object schema with properties.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }
}

/// Builder for constructing tool parameter schemas.
pub struct ParameterBuilder {
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    /// Add a string property.
    pub fn string(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            serde_json::json!({
                "type": "string",
                "description": description.into(),
            }),
        );
        if required {
            self.required.push(name);
        }
        self
    }

    /// Build into ToolParameters.
    pub fn build(self) -> ToolParameters {
        ToolParameters {
            schema: serde_json::json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}
