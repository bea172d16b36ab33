//! Structured logging helpers.
//!
//! Provides operation timing for workflow runs, pipeline stages, and
//! analyzer calls. All output goes through `tracing`; hosts choose the
//! subscriber.

use std::time::Instant;

/// Operation timer that logs start and duration.
///
/// # Examples
///
/// ```rust,ignore
/// use draftpilot_core::logging::OpTimer;
///
/// let timer = OpTimer::new("workflow", "analyze_draft").with_session("sess-1");
/// // ... perform operation ...
/// timer.finish();
/// ```
#[derive(Debug)]
pub struct OpTimer {
    /// Component being timed (e.g. "workflow", "orchestrator").
    component: String,
    /// Operation being performed (e.g. "update_draft", "score_content").
    operation: String,
    /// Session the operation belongs to, when applicable.
    session_id: Option<String>,
    /// Start time of the operation.
    start: Instant,
}

impl OpTimer {
    /// Start a new timer and log the operation start.
    #[must_use]
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        let component = component.into();
        let operation = operation.into();

        tracing::debug!(
            component = %component,
            operation = %operation,
            "operation started"
        );

        Self {
            component,
            operation,
            session_id: None,
            start: Instant::now(),
        }
    }

    /// Attach a session id included in the completion log line.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Finish the timer and log the duration.
    pub fn finish(self) {
        let duration_ms = self.start.elapsed().as_millis();

        tracing::info!(
            component = %self.component,
            operation = %self.operation,
            session_id = self.session_id.as_deref().unwrap_or("-"),
            duration_ms,
            "operation completed"
        );
    }

    /// Finish the timer with result-aware logging.
    pub fn finish_with_result<T, E: std::fmt::Display>(self, result: Result<&T, &E>) {
        let duration_ms = self.start.elapsed().as_millis();

        match result {
            Ok(_) => {
                tracing::info!(
                    component = %self.component,
                    operation = %self.operation,
                    session_id = self.session_id.as_deref().unwrap_or("-"),
                    duration_ms,
                    "operation completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    component = %self.component,
                    operation = %self.operation,
                    session_id = self.session_id.as_deref().unwrap_or("-"),
                    duration_ms,
                    error = %e,
                    "operation failed"
                );
            }
        }
    }
}
