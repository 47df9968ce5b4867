//! Generic retry/backoff wrapper shared by every adapter (spec.md §4.7):
//! up to `max_attempts` attempts, each bounded by `per_attempt_timeout`, with
//! a linear back-off between attempts. No adapter re-implements this.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Runs `op` up to `max_attempts` times. Each call gets its own
/// `per_attempt_timeout`; a timed-out or `Err`-returning attempt sleeps
/// `backoff * attempt_number` before retrying. Returns `None` only after
/// every attempt has failed or timed out.
pub async fn with_retry<T, E, F, Fut>(
    label: &str,
    max_attempts: u32,
    per_attempt_timeout: Duration,
    backoff: Duration,
    mut op: F,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    for attempt in 1..=max_attempts {
        match tokio::time::timeout(per_attempt_timeout, op()).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(err)) => {
                debug!(adapter = label, attempt, error = %err, "adapter attempt failed");
            }
            Err(_) => {
                debug!(adapter = label, attempt, timeout_s = per_attempt_timeout.as_secs(), "adapter attempt timed out");
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(backoff * attempt).await;
        }
    }

    debug!(adapter = label, max_attempts, "adapter exhausted all attempts, returning absent");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_on_first_try() {
        let result = with_retry(
            "test",
            3,
            Duration::from_secs(1),
            Duration::from_millis(1),
            || async { Ok::<_, String>(42) },
        )
        .await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_retry(
            "test",
            3,
            Duration::from_secs(1),
            Duration::from_millis(1),
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err::<u32, _>("not yet".to_string())
                    } else {
                        Ok(99)
                    }
                }
            },
        )
        .await;
        assert_eq!(result, Some(99));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_attempts_and_returns_none() {
        let result: Option<u32> = with_retry(
            "test",
            3,
            Duration::from_secs(1),
            Duration::from_millis(1),
            || async { Err::<u32, _>("always fails".to_string()) },
        )
        .await;
        assert_eq!(result, None);
    }
}
