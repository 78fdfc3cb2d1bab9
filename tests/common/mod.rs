//! Shared test fixtures: a scripted in-memory model provider.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use vitae::error::{Result, VitaeError};
use vitae::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use vitae::types::{FinishReason, ToolCall};

/// Provider that replays a fixed sequence of responses and records every
/// request it receives.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All requests seen so far, in order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| VitaeError::InvalidState("scripted provider ran out of responses".into()))
    }
}

/// A response consisting of a single function call.
pub fn call_response(name: &str, arguments: Value) -> ProviderResponse {
    ProviderResponse {
        text: String::new(),
        tool_calls: vec![ToolCall {
            id: format!("call-{name}"),
            name: name.to_string(),
            arguments,
        }],
        finish_reason: Some(FinishReason::ToolCalls),
    }
}
