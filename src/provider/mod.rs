//! Model provider trait and implementations.

pub mod files;
pub mod google;
pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FinishReason, GenerationSettings, ModelMessage, ToolCall};

/// A request sent to a model provider.
///
/// The system instruction is carried separately from the message history so
/// before-model hooks can prepend request-scoped context without touching
/// an agent's stored instruction.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub system_instruction: Option<String>,
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Vec<ToolDefinition>,
}

/// Function declaration sent to the provider API.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<FinishReason>,
}

impl ProviderResponse {
    /// A plain-text response with no function calls.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
            finish_reason: Some(FinishReason::Stop),
        }
    }
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate a response (non-streaming).
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse>;
}
