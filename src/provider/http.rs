//! Shared HTTP client for provider requests.

use std::sync::OnceLock;

static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Lazily-initialized shared client. Connection pooling across requests.
pub fn shared_client() -> &'static reqwest::Client {
    CLIENT.get_or_init(reqwest::Client::new)
}
