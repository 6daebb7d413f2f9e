//! Retry loop for fetch cycles.

use std::future::Future;

use crate::observability::metrics;
use crate::resilience::backoff::RetryPolicy;

/// Final outcome of a retried operation.
#[derive(Debug)]
pub struct Attempted<T, E> {
    pub result: Result<T, E>,
    /// Attempts made, including the initial one.
    pub attempts: u32,
}

/// Run `op` until it succeeds or the policy's retry budget is spent.
///
/// Intermediate failures are logged and counted; only the final error is
/// returned to the caller.
pub async fn retry_with_policy<T, E, F, Fut>(resource: &str, policy: &RetryPolicy, op: F) -> Attempted<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_until(resource, policy, op, std::future::pending()).await
}

/// Like [`retry_with_policy`], but gives up as soon as `cancelled` resolves.
///
/// Cancellation only interrupts the delay between attempts: an attempt in
/// progress runs to completion. A cancelled run returns the last error.
pub async fn retry_until<T, E, F, Fut, C>(
    resource: &str,
    policy: &RetryPolicy,
    mut op: F,
    cancelled: C,
) -> Attempted<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Future<Output = ()>,
{
    tokio::pin!(cancelled);

    let max_attempts = policy.max_attempts();
    let mut attempt = 1;
    loop {
        metrics::record_fetch_attempt(resource);
        match op(attempt).await {
            Ok(value) => {
                return Attempted {
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(e) if attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    resource,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Fetch failed, retrying"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => attempt += 1,
                    _ = &mut cancelled => {
                        tracing::debug!(resource, attempt, "Retry cancelled");
                        return Attempted {
                            result: Err(e),
                            attempts: attempt,
                        };
                    }
                }
            }
            Err(e) => {
                return Attempted {
                    result: Err(e),
                    attempts: attempt,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let started = Instant::now();
        let outcome = retry_with_policy("test", &RetryPolicy::default(), |attempt| async move {
            if attempt < 3 {
                Err("boom")
            } else {
                Ok(attempt)
            }
        })
        .await;

        assert_eq!(outcome.result, Ok(3));
        assert_eq!(outcome.attempts, 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2000) && elapsed < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_budget() {
        let outcome: Attempted<(), _> =
            retry_with_policy("test", &RetryPolicy::default(), |_| async { Err("down") }).await;
        assert_eq!(outcome.result, Err("down"));
        assert_eq!(outcome.attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retries_policy() {
        let started = Instant::now();
        let outcome: Attempted<(), _> = retry_with_policy("test", &RetryPolicy::none(), |_| async { Err("down") }).await;
        assert_eq!(outcome.attempts, 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_pending_retry() {
        let (cancel, cancelled) = tokio::sync::oneshot::channel::<()>();
        let calls = std::sync::atomic::AtomicU32::new(0);
        let started = Instant::now();

        let policy = RetryPolicy::default();
        let run = retry_until(
            "test",
            &policy,
            |_| {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async { Err::<(), _>("down") }
            },
            async {
                let _ = cancelled.await;
            },
        );
        let canceller = async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            let _ = cancel.send(());
        };
        let (outcome, ()) = tokio::join!(run, canceller);

        assert_eq!(outcome.result, Err("down"));
        assert_eq!(outcome.attempts, 2);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1500) && elapsed < Duration::from_millis(1510));
    }
}
