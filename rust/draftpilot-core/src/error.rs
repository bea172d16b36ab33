//! Error taxonomy for the writing-assistance core.
//!
//! Errors split into caller mistakes (`Validation`, `SessionNotFound`),
//! transient external failures (`Analyzer`), resilience outcomes
//! (`CircuitOpen`, `RetryExhausted`), and run control (`Cancelled`).
//! Only `Analyzer` failures are eligible for retry; everything else
//! propagates immediately.

use thiserror::Error;

/// Core error type for the writing-assistance engine.
#[derive(Error, Debug)]
pub enum AssistError {
    /// Malformed input, rejected before entering the workflow.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unknown or already-ended session identifier.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Transient failure from the external text analyzer.
    #[error("analyzer request failed: {0}")]
    Analyzer(String),

    /// Circuit breaker is open; analyzer calls fail fast without attempting.
    #[error("analyzer circuit open, failing fast")]
    CircuitOpen,

    /// All retry attempts were exhausted; wraps the final underlying failure.
    #[error("operation failed after {attempts} attempts")]
    RetryExhausted {
        /// Total attempts performed (initial call + retries).
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        source: Box<AssistError>,
    },

    /// Workflow run cancelled between stages.
    #[error("workflow run cancelled")]
    Cancelled,

    /// Invariant violation that should never occur in a correct build.
    #[error("internal error: {0}")]
    Internal(String),

    /// Escape hatch for host-side errors funneled through this type.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for assistance operations.
pub type AssistResult<T> = Result<T, AssistError>;

impl AssistError {
    /// Whether this error is transient and eligible for retry.
    ///
    /// Caller errors (validation, unknown session) and resilience outcomes
    /// are never retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Analyzer(_))
    }

    /// Create a validation error with context.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an analyzer failure with context.
    pub fn analyzer(msg: impl Into<String>) -> Self {
        Self::Analyzer(msg.into())
    }
}
