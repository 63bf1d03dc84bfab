// Exponential backoff with jitter for flaky LLM calls.
//
// The interpretation and summarization endpoints fail transiently under
// load. Bounded retries with doubling delays and a random jitter component
// keep concurrent extractions from retrying in lockstep. The last error is
// returned untouched once attempts are exhausted.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::warn;

pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Run `op` up to `max_attempts` times. Sleeps base * 2^n plus up to one
/// second of jitter between attempts, capped at `max_delay`.
pub async fn with_backoff<T, F, Fut>(policy: &BackoffPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= policy.max_attempts {
                    return Err(err);
                }

                // Shift capped so pathological max_attempts values can't overflow
                let backoff = policy
                    .base_delay
                    .saturating_mul(1u32 << (attempt - 1).min(16))
                    .min(policy.max_delay);
                let jitter = Duration::from_millis(rand::rng().random_range(0..1000));

                warn!(
                    attempt,
                    error = %err,
                    delay_ms = (backoff + jitter).as_millis() as u64,
                    "LLM call failed, retrying"
                );
                tokio::time::sleep(backoff + jitter).await;
            }
        }
    }
}
