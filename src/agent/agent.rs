//! Agent definition: an immutable capability set.

use std::sync::Arc;

use crate::provider::{ProviderRequest, ToolDefinition};
use crate::session::SessionState;
use crate::tools::Tool;
use crate::types::GenerationSettings;

/// Hook invoked immediately before a model request is dispatched.
///
/// May read session state and rewrite the outgoing request (context
/// injection, tracing). The agent's stored instruction is never mutated;
/// all changes are request-scoped.
pub type BeforeModelHook = Arc<dyn Fn(&str, &SessionState, &mut ProviderRequest) + Send + Sync>;

/// Predicate gating delegation to an agent.
pub type AvailabilityGuard = Arc<dyn Fn(&SessionState) -> bool + Send + Sync>;

/// A named conversational worker.
///
/// Agents hold no mutable state; all mutable data lives in session state.
/// The concrete agents differ only in configuration, not mechanism.
pub struct Agent {
    name: String,
    description: String,
    instruction: String,
    tools: Vec<Arc<dyn Tool>>,
    sub_agents: Vec<String>,
    settings: GenerationSettings,
    before_model: Vec<BeforeModelHook>,
    guard: Option<AvailabilityGuard>,
}

impl Agent {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            instruction: instruction.into(),
            tools: Vec::new(),
            sub_agents: Vec::new(),
            settings: GenerationSettings::conversational(),
            before_model: Vec::new(),
            guard: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Allow delegation to a named sub-agent.
    pub fn with_sub_agent(mut self, name: impl Into<String>) -> Self {
        self.sub_agents.push(name.into());
        self
    }

    /// Set generation settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add a before-model hook. Hooks run in registration order.
    pub fn with_before_model(mut self, hook: BeforeModelHook) -> Self {
        self.before_model.push(hook);
        self
    }

    /// Gate delegation to this agent behind a state predicate.
    pub fn with_guard(mut self, guard: AvailabilityGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn sub_agents(&self) -> &[String] {
        &self.sub_agents
    }

    pub fn before_model(&self) -> &[BeforeModelHook] {
        &self.before_model
    }

    /// Whether this agent may receive delegation given the session state.
    pub fn is_available(&self, state: &SessionState) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard(state))
    }

    /// Find one of this agent's tools by name.
    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Function declarations for this agent's own tools.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema,
            })
            .collect()
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("sub_agents", &self.sub_agents)
            .finish()
    }
}
