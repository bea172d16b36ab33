//! Circuit breaker guarding the external analyzer.
//!
//! Trips after a run of consecutive failures so a struggling analyzer is
//! not hammered by every concurrent session. Transitions:
//!
//! - **Closed**: normal operation, requests pass through
//! - **Open**: requests fail fast until the cooldown elapses
//! - **HalfOpen**: one probe request is admitted; success closes the
//!   circuit, failure re-opens it and restarts the cooldown clock
//!
//! # Example
//!
//! ```rust,ignore
//! use draftpilot_core::circuit_breaker::CircuitBreaker;
//!
//! let breaker = CircuitBreaker::default();
//!
//! if breaker.is_request_allowed() {
//!     match call_analyzer().await {
//!         Ok(result) => {
//!             breaker.record_success();
//!             Ok(result)
//!         }
//!         Err(e) => {
//!             breaker.record_failure();
//!             Err(e)
//!         }
//!     }
//! } else {
//!     Err(AssistError::CircuitOpen)
//! }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::config::CircuitBreakerConfig;

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, all requests pass through.
    Closed,

    /// Too many failures, fail fast without attempting the request.
    Open,

    /// Testing recovery, a single probe request is allowed.
    HalfOpen,
}

impl CircuitState {
    /// Convert state to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Inner mutable state.
#[derive(Debug)]
struct CircuitBreakerInner {
    /// Current state.
    state: CircuitState,

    /// Number of consecutive failures.
    failure_count: u32,

    /// Number of successful probes in HalfOpen state.
    success_count: u32,

    /// When the circuit was opened (for cooldown calculation).
    opened_at: Option<Instant>,

    /// Whether a HalfOpen probe has been admitted and is still outstanding.
    probe_in_flight: bool,
}

/// Circuit breaker for the analyzer boundary.
///
/// # Thread Safety
///
/// Cloning shares the same inner state; a clone handed to the workflow
/// engine observes the same circuit as the orchestrator's copy.
#[derive(Clone)]
pub struct CircuitBreaker {
    /// Failure threshold before opening the circuit.
    failure_threshold: u32,

    /// Cooldown before transitioning to HalfOpen.
    cooldown: Duration,

    /// Successful probes needed to close the circuit from HalfOpen.
    success_threshold: u32,

    /// Inner mutable state.
    inner: Arc<RwLock<CircuitBreakerInner>>,
}

impl CircuitBreaker {
    /// Create a breaker from configuration.
    #[must_use]
    pub fn new(config: &CircuitBreakerConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold.max(1),
            cooldown: Duration::from_secs(config.cooldown_secs),
            success_threshold: config.success_threshold.max(1),
            inner: Arc::new(RwLock::new(CircuitBreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                opened_at: None,
                probe_in_flight: false,
            })),
        }
    }

    /// Check whether a request may proceed.
    ///
    /// In HalfOpen state only one outstanding probe is admitted; further
    /// callers are rejected until the probe's outcome is recorded.
    #[must_use]
    pub fn is_request_allowed(&self) -> bool {
        let mut inner = self.inner.write();

        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let cooled_down = inner
                    .opened_at
                    .is_some_and(|opened_at| opened_at.elapsed() >= self.cooldown);

                if cooled_down {
                    tracing::info!(
                        cooldown_secs = self.cooldown.as_secs(),
                        "circuit breaker admitting probe after cooldown"
                    );
                    inner.state = CircuitState::HalfOpen;
                    inner.success_count = 0;
                    inner.probe_in_flight = true;
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    false
                } else {
                    inner.probe_in_flight = true;
                    true
                }
            }
        }
    }

    /// Record a successful request.
    pub fn record_success(&self) {
        let mut inner = self.inner.write();

        match inner.state {
            CircuitState::Closed => {
                if inner.failure_count > 0 {
                    inner.failure_count = 0;
                }
            }
            CircuitState::HalfOpen => {
                inner.probe_in_flight = false;
                inner.success_count += 1;
                tracing::debug!(
                    success_count = inner.success_count,
                    success_threshold = self.success_threshold,
                    "circuit breaker probe succeeded"
                );

                if inner.success_count >= self.success_threshold {
                    tracing::info!("circuit breaker closing after successful recovery probe");
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                    inner.opened_at = None;
                }
            }
            CircuitState::Open => {
                // Stale result from before the trip; nothing to do.
            }
        }
    }

    /// Record a failed request.
    pub fn record_failure(&self) {
        let mut inner = self.inner.write();

        match inner.state {
            CircuitState::Closed => {
                inner.failure_count += 1;
                tracing::debug!(
                    failure_count = inner.failure_count,
                    failure_threshold = self.failure_threshold,
                    "circuit breaker recorded failure"
                );

                if inner.failure_count >= self.failure_threshold {
                    tracing::warn!(
                        failure_count = inner.failure_count,
                        cooldown_secs = self.cooldown.as_secs(),
                        "circuit breaker opening"
                    );
                    inner.state = CircuitState::Open;
                    inner.opened_at = Some(Instant::now());
                }
            }
            CircuitState::HalfOpen => {
                // A failed probe reopens the circuit and restarts the clock.
                tracing::warn!("circuit breaker reopening after failed probe");
                inner.state = CircuitState::Open;
                inner.failure_count = self.failure_threshold;
                inner.success_count = 0;
                inner.probe_in_flight = false;
                inner.opened_at = Some(Instant::now());
            }
            CircuitState::Open => {}
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.inner.read().state
    }

    /// Current consecutive failure count.
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.inner.read().failure_count
    }

    /// Reset to closed state (manual recovery).
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        tracing::info!("circuit breaker manually reset");
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.success_count = 0;
        inner.opened_at = None;
        inner.probe_in_flight = false;
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(&CircuitBreakerConfig::default())
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("CircuitBreaker")
            .field("failure_threshold", &self.failure_threshold)
            .field("cooldown", &self.cooldown)
            .field("state", &inner.state)
            .field("failure_count", &inner.failure_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(failure_threshold: u32, cooldown_secs: u64) -> CircuitBreaker {
        CircuitBreaker::new(&CircuitBreakerConfig {
            failure_threshold,
            cooldown_secs,
            success_threshold: 1,
        })
    }

    #[test]
    fn test_initial_state() {
        let breaker = breaker(5, 60);
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.failure_count(), 0);
        assert!(breaker.is_request_allowed());
    }

    #[test]
    fn test_opens_after_threshold() {
        let breaker = breaker(3, 60);

        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.is_request_allowed());
    }

    #[test]
    fn test_success_resets_failures() {
        let breaker = breaker(5, 60);

        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.failure_count(), 2);

        breaker.record_success();
        assert_eq!(breaker.failure_count(), 0);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn test_half_open_after_cooldown() {
        let breaker = breaker(3, 0);

        breaker.record_failure();
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        std::thread::sleep(Duration::from_millis(10));

        assert!(breaker.is_request_allowed());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
    }

    #[test]
    fn test_half_open_admits_single_probe() {
        let breaker = breaker(3, 0);

        breaker.record_failure();
        breaker.record_failure();
        breaker.record_failure();

        std::thread::sleep(Duration::from_millis(10));

        // First caller gets the probe slot; a concurrent caller is rejected
        // until the probe outcome is recorded.
        assert!(breaker.is_request_allowed());
        assert!(!breaker.is_request_allowed());

        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(breaker.is_request_allowed());
    }

    #[test]
    fn test_probe_success_closes() {
        let breaker = breaker(3, 0);

        breaker.record_failure();
        breaker.record_failure();
        breaker.record_failure();

        std::thread::sleep(Duration::from_millis(10));
        assert!(breaker.is_request_allowed());

        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.failure_count(), 0);
    }

    #[test]
    fn test_probe_failure_reopens() {
        let breaker = breaker(3, 0);

        breaker.record_failure();
        breaker.record_failure();
        breaker.record_failure();

        std::thread::sleep(Duration::from_millis(10));
        assert!(breaker.is_request_allowed());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[test]
    fn test_multi_probe_success_threshold() {
        let breaker = CircuitBreaker::new(&CircuitBreakerConfig {
            failure_threshold: 2,
            cooldown_secs: 0,
            success_threshold: 2,
        });

        breaker.record_failure();
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(10));

        assert!(breaker.is_request_allowed());
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        assert!(breaker.is_request_allowed());
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn test_reset() {
        let breaker = breaker(3, 60);

        breaker.record_failure();
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        breaker.reset();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(breaker.is_request_allowed());
    }

    #[test]
    fn test_state_as_str() {
        assert_eq!(CircuitState::Closed.as_str(), "closed");
        assert_eq!(CircuitState::Open.as_str(), "open");
        assert_eq!(CircuitState::HalfOpen.as_str(), "half_open");
    }

    #[test]
    fn test_clones_share_state() {
        let breaker = breaker(1, 60);
        let clone = breaker.clone();

        breaker.record_failure();
        assert_eq!(clone.state(), CircuitState::Open);
    }
}
