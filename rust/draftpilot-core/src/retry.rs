//! Bounded retry with exponential backoff and jitter.
//!
//! [`RetryExecutor`] wraps any fallible async operation. Delays grow
//! exponentially from `base_delay_ms` up to `max_delay_ms` and are
//! optionally jittered into [0.5, 1.0) of the computed value to avoid
//! thundering herds. Sleeping uses `tokio::time::sleep`, so waiting
//! between attempts never blocks other workflow runs.
//!
//! Only errors the configured predicate accepts are retried (by default
//! just transient analyzer failures); anything else propagates on the
//! spot. When every attempt fails the caller gets
//! [`AssistError::RetryExhausted`] wrapping the final error.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::circuit_breaker::CircuitBreaker;
use crate::config::RetryConfig;
use crate::error::{AssistError, AssistResult};

/// Executes async operations with bounded exponential-backoff retry.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
    retryable: fn(&AssistError) -> bool,
}

impl RetryExecutor {
    /// Create an executor retrying transient errors per
    /// [`AssistError::is_transient`].
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            retryable: AssistError::is_transient,
        }
    }

    /// Override which errors are considered retryable.
    #[must_use]
    pub fn with_retryable(mut self, retryable: fn(&AssistError) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Run `op` with up to `max_retries + 1` total attempts.
    ///
    /// # Errors
    ///
    /// Propagates non-retryable errors immediately; returns
    /// [`AssistError::RetryExhausted`] after the final failed attempt.
    pub async fn execute<T, F, Fut>(&self, operation: &str, op: F) -> AssistResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AssistResult<T>>,
    {
        self.run(None, operation, op).await
    }

    /// Run `op` behind a circuit breaker.
    ///
    /// The breaker is consulted before every attempt and fed the outcome
    /// afterwards. While the circuit is open the call fails fast with
    /// [`AssistError::CircuitOpen`] instead of burning attempts.
    ///
    /// # Errors
    ///
    /// As [`RetryExecutor::execute`], plus `CircuitOpen`.
    pub async fn execute_guarded<T, F, Fut>(
        &self,
        breaker: &CircuitBreaker,
        operation: &str,
        op: F,
    ) -> AssistResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AssistResult<T>>,
    {
        self.run(Some(breaker), operation, op).await
    }

    async fn run<T, F, Fut>(
        &self,
        breaker: Option<&CircuitBreaker>,
        operation: &str,
        op: F,
    ) -> AssistResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AssistResult<T>>,
    {
        let total_attempts = self.config.max_retries + 1;
        let mut last_error: Option<AssistError> = None;

        for attempt in 0..total_attempts {
            if let Some(breaker) = breaker {
                if !breaker.is_request_allowed() {
                    tracing::warn!(operation, attempt, "circuit open, failing fast");
                    return Err(AssistError::CircuitOpen);
                }
            }

            tracing::debug!(operation, attempt = attempt + 1, total_attempts, "executing");

            match op().await {
                Ok(value) => {
                    if let Some(breaker) = breaker {
                        breaker.record_success();
                    }
                    if attempt > 0 {
                        tracing::info!(operation, retries = attempt, "succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let retryable = (self.retryable)(&err);
                    if let Some(breaker) = breaker {
                        if retryable {
                            breaker.record_failure();
                        }
                    }

                    if !retryable {
                        tracing::error!(operation, error = %err, "non-retryable failure");
                        return Err(err);
                    }

                    if attempt + 1 == total_attempts {
                        tracing::error!(
                            operation,
                            attempts = total_attempts,
                            error = %err,
                            "all attempts exhausted"
                        );
                        last_error = Some(err);
                        break;
                    }

                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "attempt failed, retrying"
                    );
                    last_error = Some(err);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(AssistError::RetryExhausted {
            attempts: total_attempts,
            source: Box::new(
                last_error.unwrap_or_else(|| AssistError::analyzer("no attempt recorded")),
            ),
        })
    }

    /// Delay before the retry following failed attempt `attempt` (0-based).
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.config.base_delay_ms as f64 * self.config.exponential_base.powi(exponent);
        let capped = raw.min(self.config.max_delay_ms as f64);

        let jittered = if self.config.jitter {
            // 50-100% of the computed delay, spreading out concurrent retries.
            capped * (0.5 + rand::rng().random::<f64>() * 0.5)
        } else {
            capped
        };

        Duration::from_millis(jittered as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::config::CircuitBreakerConfig;

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
            exponential_base: 2.0,
            jitter: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_two_failures_with_two_waits() {
        let executor = RetryExecutor::new(fast_config(3));
        let calls = AtomicU32::new(0);

        let started = tokio::time::Instant::now();
        let result = executor
            .execute("flaky", || async {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if call < 3 {
                    Err(AssistError::analyzer("transient"))
                } else {
                    Ok(call)
                }
            })
            .await
            .expect("third attempt succeeds");

        assert_eq!(result, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Exactly two delayed waits: 1s then 2s of backoff.
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_wraps_last_error() {
        let executor = RetryExecutor::new(fast_config(3));
        let calls = AtomicU32::new(0);

        let err = executor
            .execute::<(), _, _>("always-down", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AssistError::analyzer("still down"))
            })
            .await
            .expect_err("all attempts fail");

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match err {
            AssistError::RetryExhausted { attempts, source } => {
                assert_eq!(attempts, 4);
                assert_eq!(source.to_string(), "analyzer request failed: still down");
            }
            other => panic!("expected RetryExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_retryable_propagates_immediately() {
        let executor = RetryExecutor::new(fast_config(5));
        let calls = AtomicU32::new(0);

        let err = executor
            .execute::<(), _, _>("lookup", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AssistError::SessionNotFound("s-1".to_string()))
            })
            .await
            .expect_err("caller error");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, AssistError::SessionNotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_capped_at_max() {
        let executor = RetryExecutor::new(RetryConfig {
            max_retries: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 1_500,
            exponential_base: 10.0,
            jitter: false,
        });

        let started = tokio::time::Instant::now();
        let _ = executor
            .execute::<(), _, _>("capped", || async {
                Err(AssistError::analyzer("down"))
            })
            .await;

        // Delays: 1s, then 10s and 100s both capped to 1.5s.
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_opens_and_fails_fast() {
        let executor = RetryExecutor::new(fast_config(1));
        let breaker = CircuitBreaker::new(&CircuitBreakerConfig {
            failure_threshold: 2,
            cooldown_secs: 300,
            success_threshold: 1,
        });
        let calls = AtomicU32::new(0);

        // Two failed attempts trip the breaker.
        let err = executor
            .execute_guarded::<(), _, _>(&breaker, "guarded", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AssistError::analyzer("down"))
            })
            .await
            .expect_err("exhausted");
        assert!(matches!(err, AssistError::RetryExhausted { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Circuit is now open: no further attempts are made.
        let err = executor
            .execute_guarded::<(), _, _>(&breaker, "guarded", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AssistError::analyzer("down"))
            })
            .await
            .expect_err("short-circuited");
        assert!(matches!(err, AssistError::CircuitOpen));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_breaker_records_success() {
        let executor = RetryExecutor::new(fast_config(0));
        let breaker = CircuitBreaker::default();

        breaker.record_failure();
        let value = executor
            .execute_guarded(&breaker, "ok", || async { Ok(7) })
            .await
            .expect("succeeds");

        assert_eq!(value, 7);
        assert_eq!(breaker.failure_count(), 0);
    }
}
