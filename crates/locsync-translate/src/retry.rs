use std::future::Future;
use std::time::Duration;

use locsync_core::ProviderError;

/// Bounded retry with linear backoff and a hard per-call timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of calls, including the first one.
    pub attempts: u32,
    /// Delay after failed attempt `n` is `backoff_base * n`.
    pub backoff_base: Duration,
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_base: Duration::from_millis(400),
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Wait inserted after the `attempt`-th failure (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds or the attempt ceiling is reached, then
    /// return the last error. A call exceeding `call_timeout` is dropped and
    /// counts as a failed attempt.
    pub async fn run<F, Fut, T>(&self, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max = self.attempts.max(1);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let outcome = match tokio::time::timeout(self.call_timeout, op()).await {
                Ok(res) => res,
                Err(_) => Err(ProviderError::Timeout(self.call_timeout)),
            };
            match outcome {
                Ok(v) => return Ok(v),
                Err(e) if attempt >= max => return Err(e),
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    tracing::debug!(
                        event = "provider_retry",
                        attempt = attempt,
                        max = max,
                        delay_ms = delay.as_millis() as u64,
                        error = %e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn transport(msg: &str) -> ProviderError {
        ProviderError::Transport(msg.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_before_ceiling() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let res = policy
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(transport("flaky"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;
        assert_eq!(res, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_last_error_with_linear_backoff() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let started = Instant::now();
        let res: Result<(), _> = policy
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(transport(&format!("fail {n}"))) }
            })
            .await;

        assert_eq!(res, Err(transport("fail 3")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 400ms after the first failure, 800ms after the second, none after the last.
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(1200), "waited {waited:?}");
        assert!(waited < Duration::from_millis(1300), "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_does_not_sleep() {
        let policy = RetryPolicy::default();
        let started = Instant::now();
        let res = policy.run(|| async { Ok::<_, ProviderError>("ok") }).await;
        assert_eq!(res, Ok("ok"));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_counts_as_failed_attempt() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            attempts: 2,
            backoff_base: Duration::from_millis(400),
            call_timeout: Duration::from_secs(30),
        };
        let res: Result<(), _> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(())
                }
            })
            .await;
        assert_eq!(res, Err(ProviderError::Timeout(Duration::from_secs(30))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_then_fast_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            attempts: 3,
            backoff_base: Duration::from_millis(10),
            call_timeout: Duration::from_secs(1),
        };
        let res = policy
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 1 {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    Ok::<_, ProviderError>(n)
                }
            })
            .await;
        assert_eq!(res, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_calls_once() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            attempts: 0,
            ..RetryPolicy::default()
        };
        let _ = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(transport("nope")) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delays_grow_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(400));
        assert_eq!(policy.delay_after(2), Duration::from_millis(800));
        assert_eq!(policy.delay_after(3), Duration::from_millis(1200));
    }

    #[test]
    fn huge_backoff_saturates() {
        let policy = RetryPolicy {
            attempts: u32::MAX,
            backoff_base: Duration::from_millis(u64::MAX),
            call_timeout: Duration::from_secs(30),
        };
        assert_eq!(policy.delay_after(u32::MAX), Duration::MAX);
    }
}
