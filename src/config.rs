//! Environment-layered configuration.

use crate::error::{Result, VitaeError};
use crate::util::retry::RetryPolicy;

/// Application name used to scope sessions.
pub const APP_NAME: &str = "resume_parser";

/// User id used when no explicit user is supplied.
pub const DEFAULT_USER_ID: &str = "default";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Process-level configuration: credential, model id, retry policy.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API credential for the model service, if configured.
    pub api_key: Option<String>,
    /// Model identifier string.
    pub model: String,
    /// Retry policy handed to the model provider.
    pub retry: RetryPolicy,
}

impl AppConfig {
    /// Load from environment variables (`GOOGLE_API_KEY` / `GEMINI_API_KEY`,
    /// `VITAE_MODEL`), reading a `.env` file first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok();
        let model = std::env::var("VITAE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self {
            api_key,
            model,
            retry: RetryPolicy::default(),
        }
    }

    /// The configured API key, or a configuration error naming the variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| VitaeError::Configuration("GOOGLE_API_KEY is not set".into()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}
