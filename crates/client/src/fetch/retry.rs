//! Backoff policy and retry combinator for transient fetch failures.
//!
//! The delay doubles per attempt and is randomized within ±25% of the base
//! so that many clients retrying against one upstream host do not
//! synchronize into retry storms.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// A classified fetch failure. `status` is `None` for network errors and
/// timeouts that never produced an HTTP response.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct FetchFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl FetchFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }

    /// Transient failures: no HTTP status at all, or a 503 from the
    /// upstream. Every other status is fatal.
    pub fn is_retryable(&self) -> bool {
        matches!(self.status, None | Some(503))
    }
}

/// Delay before the retry following `attempt` (1-based): `base * 2^(n-1)`,
/// jittered to `[0.75, 1.25]` of that value.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    let exp = base.as_millis() as f64 * 2f64.powi(attempt.saturating_sub(1) as i32);
    let jitter = rand::rng().random_range(0.75..=1.25);
    Duration::from_millis((exp * jitter) as u64)
}

/// Run `op` until it succeeds, a non-retryable failure occurs, or
/// `attempts` total tries are exhausted. The last failure propagates.
pub async fn retry_with_backoff<T, F, Fut>(
    attempts: u32, base: Duration, mut op: F,
) -> Result<T, FetchFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchFailure>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(failure) => {
                if !failure.is_retryable() || attempt >= attempts.max(1) {
                    return Err(failure);
                }
                let delay = backoff_delay(attempt, base);
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    failure = %failure,
                    "retrying after transient fetch failure"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
