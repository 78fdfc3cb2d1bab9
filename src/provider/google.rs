//! Google Gemini API provider.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, VitaeError};
use crate::types::{ContentPart, FinishReason, ResponseFormat, Role, ToolCall};
use crate::util::retry::RetryPolicy;

use super::http::shared_client;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    model: String,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GoogleProvider {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the API base URL (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let mut contents = Vec::new();

        for msg in &request.messages {
            match msg.role {
                Role::User => {
                    let parts = build_gemini_parts(&msg.content);
                    contents.push(json!({"role": "user", "parts": parts}));
                }
                Role::Assistant => {
                    let mut parts = Vec::new();
                    for part in &msg.content {
                        match part {
                            ContentPart::Text { text } => parts.push(json!({"text": text})),
                            ContentPart::ToolCall(tc) => parts.push(json!({
                                "functionCall": {"name": tc.name, "args": tc.arguments}
                            })),
                            _ => {}
                        }
                    }
                    contents.push(json!({"role": "model", "parts": parts}));
                }
                Role::Tool => {
                    for part in &msg.content {
                        if let ContentPart::ToolResult(tr) = part {
                            contents.push(json!({
                                "role": "function",
                                "parts": [{
                                    "functionResponse": {
                                        "name": tr.name,
                                        "response": tr.response,
                                    }
                                }]
                            }));
                        }
                    }
                }
            }
        }

        let mut body = json!({ "contents": contents });
        let obj = body.as_object_mut().unwrap();

        if let Some(ref sys) = request.system_instruction {
            obj.insert(
                "systemInstruction".into(),
                json!({"parts": [{"text": sys}]}),
            );
        }

        let mut gen_config = Map::new();
        if let Some(max) = request.settings.max_output_tokens {
            gen_config.insert("maxOutputTokens".into(), max.into());
        }
        if let Some(temp) = request.settings.temperature {
            gen_config.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            gen_config.insert("topP".into(), top_p.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            gen_config.insert("stopSequences".into(), json!(stops));
        }
        match request.settings.response_format {
            Some(ResponseFormat::JsonSchema { ref schema }) => {
                gen_config.insert("responseMimeType".into(), "application/json".into());
                gen_config.insert("responseSchema".into(), schema.clone());
            }
            Some(ResponseFormat::JsonObject) => {
                gen_config.insert("responseMimeType".into(), "application/json".into());
            }
            _ => {}
        }
        if !gen_config.is_empty() {
            obj.insert("generationConfig".into(), Value::Object(gen_config));
        }

        if !request.tools.is_empty() {
            let fn_decls: Vec<Value> = request
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    })
                })
                .collect();
            obj.insert("tools".into(), json!([{"functionDeclarations": fn_decls}]));
        }

        body
    }

    async fn generate_once(&self, body: &Value) -> Result<ProviderResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = shared_client().post(&url).json(body).send().await?;
        let status = response.status();
        let payload: Value = if status.is_success() {
            response.json().await?
        } else {
            let message = response.text().await.unwrap_or_default();
            return Err(VitaeError::api(status.as_u16(), message));
        };

        parse_response(&payload)
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let body = self.build_request_body(request);
        debug!(model = %self.model, messages = request.messages.len(), "dispatching generateContent");
        self.retry.execute(|| self.generate_once(&body)).await
    }
}

fn build_gemini_parts(content: &[ContentPart]) -> Vec<Value> {
    content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(json!({"text": text})),
            ContentPart::File(file) => {
                let mut file_data = Map::new();
                file_data.insert("fileUri".into(), file.file_uri.clone().into());
                if let Some(ref mime) = file.mime_type {
                    file_data.insert("mimeType".into(), mime.clone().into());
                }
                Some(json!({"fileData": Value::Object(file_data)}))
            }
            _ => None,
        })
        .collect()
}

fn parse_response(payload: &Value) -> Result<ProviderResponse> {
    let candidate = payload["candidates"]
        .get(0)
        .ok_or_else(|| VitaeError::Provider {
            provider: "google".into(),
            message: "response contained no candidates".into(),
        })?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    if let Some(parts) = candidate["content"]["parts"].as_array() {
        for part in parts {
            if let Some(t) = part["text"].as_str() {
                text.push_str(t);
            } else if let Some(call) = part.get("functionCall") {
                tool_calls.push(ToolCall {
                    // Gemini function calls carry no id; mint one for correlation.
                    id: Uuid::new_v4().to_string(),
                    name: call["name"].as_str().unwrap_or_default().to_string(),
                    arguments: call.get("args").cloned().unwrap_or(Value::Null),
                });
            }
        }
    }

    let finish_reason = match candidate["finishReason"].as_str() {
        Some("STOP") if !tool_calls.is_empty() => Some(FinishReason::ToolCalls),
        Some("STOP") => Some(FinishReason::Stop),
        Some("MAX_TOKENS") => Some(FinishReason::Length),
        Some("SAFETY") => Some(FinishReason::ContentFilter),
        Some(_) => Some(FinishReason::Error),
        None => None,
    };

    Ok(ProviderResponse {
        text,
        tool_calls,
        finish_reason,
    })
}
