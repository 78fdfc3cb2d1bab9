//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use crate::error::VitaeError;

/// Retry policy configuration.
///
/// Delay grows as `initial_delay * exp_base^attempt`, jittered. Only
/// network faults and API errors whose status is in
/// [`retryable_status_codes`](Self::retryable_status_codes) are retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub attempts: u32,
    /// Exponential backoff base.
    pub exp_base: f64,
    /// Initial backoff duration.
    pub initial_delay: Duration,
    /// HTTP status codes considered transient.
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            exp_base: 7.0,
            initial_delay: Duration::from_secs(1),
            retryable_status_codes: vec![429, 500, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Execute an async operation with retry.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, VitaeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, VitaeError>>,
    {
        let mut last_error = None;

        for attempt in 0..self.attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !e.is_retryable(&self.retryable_status_codes)
                        || attempt + 1 >= self.attempts
                    {
                        return Err(e);
                    }

                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = self.attempts,
                        error = %e,
                        "Retrying after error"
                    );

                    let backoff = self.initial_delay.as_secs_f64() * self.exp_base.powi(attempt as i32);
                    // Jitter: 75%–125% of backoff
                    let jitter_factor = 0.75 + (rand_factor() * 0.5);
                    tokio::time::sleep(Duration::from_secs_f64(backoff * jitter_factor)).await;

                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| VitaeError::InvalidState("retry loop exhausted".into())))
    }
}

/// Simple pseudo-random factor [0, 1) without pulling in the rand crate.
fn rand_factor() -> f64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    std::thread::current().id().hash(&mut hasher);

    let hash = hasher.finish();
    (hash % 10000) as f64 / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            exp_base: 1.0,
            initial_delay: Duration::from_millis(1),
            retryable_status_codes: vec![429, 500, 503, 504],
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = fast_policy()
            .execute(|| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(VitaeError::api(503, "unavailable"))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_fails_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = fast_policy()
            .execute(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(VitaeError::api(400, "bad request")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausts_attempts_and_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = fast_policy()
            .execute(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(VitaeError::api(429, "rate limited")) }
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            VitaeError::Api { status: 429, .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn default_policy_matches_service_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.exp_base, 7.0);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.retryable_status_codes, vec![429, 500, 503, 504]);
    }
}
