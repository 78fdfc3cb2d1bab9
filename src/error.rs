//! Error types for Vitae.

use thiserror::Error;

/// Primary error type for all Vitae operations.
#[derive(Error, Debug)]
pub enum VitaeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl VitaeError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error is retryable under the given status-code policy.
    ///
    /// Network-level failures are always retryable; API errors only when
    /// their status code is in `retryable_codes`.
    pub fn is_retryable(&self, retryable_codes: &[u16]) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => retryable_codes.contains(status),
            _ => false,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, VitaeError>;
