//! Session runner: drives the turn loop for one session.

use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::agent::topology::TRANSFER_TOOL;
use crate::agent::{DelegationDecision, Topology};
use crate::error::{Result, VitaeError};
use crate::provider::{ModelProvider, ProviderRequest};
use crate::session::{Session, SessionStore};
use crate::tools::{ToolArguments, ToolContext};
use crate::types::ModelMessage;

/// Upper bound on model round-trips per user input. A turn that keeps
/// emitting function calls past this is runaway and gets cut off.
const MAX_TOOL_ITERATIONS: usize = 16;

/// One user input to process: plain text or a prebuilt message.
#[derive(Debug, Clone)]
pub enum UserInput {
    Text(String),
    Message(ModelMessage),
}

impl UserInput {
    /// Normalize into the uniform message representation.
    fn into_message(self) -> ModelMessage {
        match self {
            Self::Text(text) => ModelMessage::user(text),
            Self::Message(message) => message,
        }
    }
}

impl From<&str> for UserInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for UserInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<ModelMessage> for UserInput {
    fn from(message: ModelMessage) -> Self {
        Self::Message(message)
    }
}

/// A response event surfaced while processing one input.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    Text {
        agent: String,
        text: String,
    },
    ToolCall {
        agent: String,
        name: String,
        arguments: Value,
    },
    ToolResult {
        agent: String,
        name: String,
        result: String,
        is_error: bool,
    },
    Delegated {
        from: String,
        to: String,
    },
    DelegationDenied {
        agent: String,
        target: String,
        reason: String,
    },
}

/// Observer invoked for each event as it is surfaced.
pub type EventSink = Arc<dyn Fn(&TurnEvent) + Send + Sync>;

/// Drives conversational sessions over a delegation topology.
///
/// Inputs are processed strictly in submission order; the event sequence for
/// input *i* is fully drained before input *i+1* is dispatched. The caller
/// guarantees at most one in-flight run per session id.
pub struct SessionRunner<'a> {
    topology: &'a Topology,
    provider: &'a dyn ModelProvider,
    store: &'a mut SessionStore,
    event_sink: Option<EventSink>,
}

impl<'a> SessionRunner<'a> {
    pub fn new(
        topology: &'a Topology,
        provider: &'a dyn ModelProvider,
        store: &'a mut SessionStore,
    ) -> Self {
        Self {
            topology,
            provider,
            store,
            event_sink: None,
        }
    }

    /// Observe events as they are surfaced.
    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Process `inputs` against the named session, creating it if needed.
    ///
    /// A newly created session gets the current date prepended to its first
    /// input, exactly once in its lifetime.
    pub async fn run(
        &mut self,
        session_id: &str,
        inputs: Vec<UserInput>,
    ) -> Result<Vec<TurnEvent>> {
        let topology = self.topology;
        let provider = self.provider;
        let sink = self.event_sink.clone();
        let (session, is_new) = self.store.get_or_create(session_id);

        let mut events = Vec::new();
        if inputs.is_empty() {
            debug!(session_id, "no inputs to process");
            return Ok(events);
        }

        let mut first = true;
        for input in inputs {
            let mut message = input.into_message();
            if first && is_new && !session.date_annotated {
                let date = Local::now().format("%A, %B %d, %Y").to_string();
                message.prepend_text(&format!("[Today's date: {date}]\n\n"));
                session.date_annotated = true;
                info!(session_id, %date, "added date context to first input");
            }
            first = false;

            session.history.push(message);
            drive_turn(topology, provider, &sink, session, &mut events).await?;
        }

        Ok(events)
    }
}

/// Run model round-trips for the latest input until the active agent stops
/// emitting function calls.
async fn drive_turn(
    topology: &Topology,
    provider: &dyn ModelProvider,
    sink: &Option<EventSink>,
    session: &mut Session,
    events: &mut Vec<TurnEvent>,
) -> Result<()> {
    let session_id = session.key.session_id.clone();
    let mut active = session
        .active_agent
        .clone()
        .unwrap_or_else(|| topology.root().name().to_string());

    for _ in 0..MAX_TOOL_ITERATIONS {
        let agent = topology
            .agent(&active)
            .ok_or_else(|| VitaeError::InvalidState(format!("unknown active agent: {active}")))?;

        let mut tools = agent.tool_definitions();
        if let Some(transfer) = topology.transfer_definition(agent) {
            tools.push(transfer);
        }
        let mut request = ProviderRequest {
            system_instruction: Some(agent.instruction().to_string()),
            messages: session.history.clone(),
            settings: agent.settings().clone(),
            tools,
        };
        for hook in agent.before_model() {
            hook(&session_id, &session.state, &mut request);
        }

        let response = provider.generate(&request).await?;

        if !response.text.is_empty() {
            session.history.push(ModelMessage::assistant(&response.text));
            emit(
                sink,
                events,
                TurnEvent::Text {
                    agent: active.clone(),
                    text: response.text.clone(),
                },
            );
        }

        if response.tool_calls.is_empty() {
            session.active_agent = Some(active);
            return Ok(());
        }

        session
            .history
            .push(ModelMessage::assistant_tool_calls(response.tool_calls.clone()));

        for call in response.tool_calls {
            emit(
                sink,
                events,
                TurnEvent::ToolCall {
                    agent: active.clone(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                },
            );

            let (result_text, is_error) = if call.name == TRANSFER_TOOL {
                let target = call
                    .arguments
                    .get("agent_name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                match topology.can_delegate(agent, &target, &session.state) {
                    DelegationDecision::Allowed => {
                        info!(session_id = %session_id, from = %active, to = %target, "delegating");
                        emit(
                            sink,
                            events,
                            TurnEvent::Delegated {
                                from: active.clone(),
                                to: target.clone(),
                            },
                        );
                        session.active_agent = Some(target.clone());
                        active = target.clone();
                        (format!("Transferred to {target}."), false)
                    }
                    DelegationDecision::GuardRejected(reason) => {
                        warn!(session_id = %session_id, target = %target, %reason, "delegation denied by guard");
                        emit(
                            sink,
                            events,
                            TurnEvent::DelegationDenied {
                                agent: active.clone(),
                                target: target.clone(),
                                reason: reason.clone(),
                            },
                        );
                        (reason, true)
                    }
                    DelegationDecision::UnknownAgent | DelegationDecision::NotASubAgent => {
                        let reason =
                            format!("Cannot transfer to '{target}': it is not an available agent.");
                        warn!(session_id = %session_id, target = %target, "delegation to unavailable agent");
                        emit(
                            sink,
                            events,
                            TurnEvent::DelegationDenied {
                                agent: active.clone(),
                                target,
                                reason: reason.clone(),
                            },
                        );
                        (reason, true)
                    }
                }
            } else if let Some(tool) = agent.find_tool(&call.name) {
                let args = ToolArguments::new(call.arguments.clone());
                let mut ctx = ToolContext {
                    session_id: &session_id,
                    state: &mut session.state,
                    provider,
                };
                let outcome = tool.execute(&args, &mut ctx).await;
                if outcome.is_error() {
                    warn!(session_id = %session_id, tool = %call.name, result = %outcome.message, "tool reported an error");
                }
                let is_error = outcome.is_error();
                (outcome.into_text(), is_error)
            } else {
                warn!(session_id = %session_id, tool = %call.name, "model called an unknown tool");
                (format!("Unknown tool '{}'.", call.name), true)
            };

            session.history.push(ModelMessage::tool_result(
                &call.id,
                &call.name,
                json!({"result": result_text}),
                is_error,
            ));
            emit(
                sink,
                events,
                TurnEvent::ToolResult {
                    agent: active.clone(),
                    name: call.name.clone(),
                    result: result_text,
                    is_error,
                },
            );
        }
    }

    warn!(session_id = %session_id, cap = MAX_TOOL_ITERATIONS, "tool iteration cap reached; ending turn");
    session.active_agent = Some(active);
    Ok(())
}

fn emit(sink: &Option<EventSink>, events: &mut Vec<TurnEvent>, event: TurnEvent) {
    if let Some(sink) = sink {
        sink(&event);
    }
    events.push(event);
}
