use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::{ModelError, ModelResult};

/// Randomized exponential backoff applied uniformly around every external
/// call. Non-retryable errors (auth, bad request, not found, quota
/// exhaustion) surface immediately; everything else is retried until the
/// attempt budget runs out, then the last error surfaces to the caller's
/// fallback.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub max_wait: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base: Duration, max_wait: Duration) -> Self {
        Self {
            max_attempts,
            base,
            max_wait,
        }
    }

    /// Budget for embedding and keyword-generation calls.
    pub fn embedding() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(30))
    }

    /// Budget for classification judgments, which are more valuable and
    /// rate-limited more generously.
    pub fn judgment() -> Self {
        Self::new(5, Duration::from_secs(2), Duration::from_secs(60))
    }

    /// Budget for single-headline rewrites.
    pub fn rewrite() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(60))
    }

    /// Runs `op`, retrying transient failures with jittered exponential
    /// backoff.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> ModelResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ModelResult<T>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(e);
                    }
                    let wait = self.backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        wait_ms = wait.as_millis() as u64,
                        "retrying after error: {e}"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Random wait in [0, min(base * 2^attempt, max_wait)].
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self
            .base
            .saturating_mul(2u32.saturating_pow(attempt.min(16)));
        let cap = exp.min(self.max_wait);
        if cap.is_zero() {
            return cap;
        }
        let jittered = rand::thread_rng().gen_range(0.0..1.0) * cap.as_secs_f64();
        Duration::from_secs_f64(jittered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(
            max_attempts,
            Duration::from_millis(1),
            Duration::from_millis(2),
        )
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = fast_policy(3)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ModelError>(42) }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = fast_policy(3)
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ModelError::Service {
                            status: 503,
                            message: "overloaded".to_string(),
                        })
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_attempts_and_surfaces_last_error() {
        let calls = AtomicU32::new(0);
        let result: ModelResult<()> = fast_policy(3)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ModelError::Service {
                        status: 500,
                        message: "boom".to_string(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(ModelError::Service { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_quota_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: ModelResult<()> = fast_policy(5)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ModelError::QuotaExceeded("daily".to_string())) }
            })
            .await;
        assert!(matches!(result, Err(ModelError::QuotaExceeded(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_auth_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: ModelResult<()> = fast_policy(5)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ModelError::Auth("bad key".to_string())) }
            })
            .await;
        assert!(matches!(result, Err(ModelError::Auth(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_capped_at_max_wait() {
        let policy = RetryPolicy::new(10, Duration::from_secs(2), Duration::from_secs(5));
        for attempt in 1..10 {
            assert!(policy.backoff(attempt) <= Duration::from_secs(5));
        }
    }
}
