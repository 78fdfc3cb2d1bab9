//! Generation settings and related enums.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Settings controlling text generation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationSettings {
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
    pub response_format: Option<ResponseFormat>,
}

impl GenerationSettings {
    /// Settings used by the conversational agents.
    pub fn conversational() -> Self {
        Self {
            temperature: Some(0.7),
            max_output_tokens: Some(2000),
            ..Self::default()
        }
    }

    /// Deterministic settings for schema-constrained extraction calls.
    pub fn extraction(schema: serde_json::Value) -> Self {
        Self {
            temperature: Some(0.0),
            max_output_tokens: Some(8000),
            response_format: Some(ResponseFormat::JsonSchema { schema }),
            ..Self::default()
        }
    }
}

/// Requested response format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
    JsonSchema { schema: serde_json::Value },
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
}
