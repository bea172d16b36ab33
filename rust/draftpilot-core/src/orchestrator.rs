//! Session-scoped orchestration facade.
//!
//! Owns the session registry and the historical pattern store, and drives
//! the workflow engine for every draft update. Also exposes the stateless
//! entry points (batch post analysis, one-shot keyword recommendations,
//! direct scoring) that bypass session state entirely.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use draftpilot_core::{Orchestrator, domain::UserProfile};
//!
//! let orchestrator = Orchestrator::new(Arc::new(analyzer));
//! let session_id = orchestrator.start_session(UserProfile::new("writer-1")).await?;
//! let payload = orchestrator.update_draft(&session_id, "First draft...", Some(0)).await?;
//! let summary = orchestrator.end_session(&session_id).await?;
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::analyzer::{TextAnalyzer, sanitize_blog_analysis, sanitize_keyword_analysis};
use crate::circuit_breaker::{CircuitBreaker, CircuitState};
use crate::config::AssistConfig;
use crate::domain::{
    BlogAnalysisResult, BlogPost, ScoreSnapshot, SessionSummary, SuggestionPayload, UserProfile,
};
use crate::error::{AssistError, AssistResult};
use crate::history::{HistoricalPattern, HistoricalPatternStore};
use crate::logging::OpTimer;
use crate::retry::RetryExecutor;
use crate::scoring::{ComprehensiveScore, ScoringEngine};
use crate::session::SessionStore;
use crate::workflow::{WorkflowEngine, WorkflowRunState};

/// Largest batch accepted by [`Orchestrator::analyze_blog_posts`].
const MAX_BATCH_POSTS: usize = 50;

/// Minimum meaningful post length for batch analysis, in characters.
const MIN_POST_CHARS: usize = 10;

/// Point-in-time orchestrator statistics.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorStatus {
    /// Sessions currently registered.
    pub active_sessions: usize,
    /// Patterns stored across all history keys.
    pub total_patterns_stored: usize,
    /// Analyzer circuit state (`closed`, `open`, `half_open`).
    pub analyzer_circuit: &'static str,
}

/// Component health report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Overall health: false while the analyzer circuit is open.
    pub healthy: bool,
    /// Sessions currently registered.
    pub active_sessions: usize,
    /// Analyzer circuit state.
    pub analyzer_circuit: &'static str,
    /// When the report was taken.
    pub last_check: chrono::DateTime<Utc>,
}

/// Facade over sessions, scoring, history, and the draft workflow.
pub struct Orchestrator {
    analyzer: Arc<dyn TextAnalyzer>,
    scoring: Arc<ScoringEngine>,
    sessions: SessionStore,
    history: Arc<HistoricalPatternStore>,
    workflow: WorkflowEngine,
    retry: RetryExecutor,
    breaker: CircuitBreaker,
    config: AssistConfig,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("active_sessions", &self.sessions.len())
            .field("breaker", &self.breaker)
            .field("config", &self.config)
            .finish()
    }
}

impl Orchestrator {
    /// Create an orchestrator with default configuration.
    #[must_use]
    pub fn new(analyzer: Arc<dyn TextAnalyzer>) -> Self {
        Self::with_config(analyzer, AssistConfig::default())
    }

    /// Create an orchestrator with explicit configuration.
    #[must_use]
    pub fn with_config(analyzer: Arc<dyn TextAnalyzer>, config: AssistConfig) -> Self {
        let scoring = Arc::new(ScoringEngine::new());
        let history = Arc::new(HistoricalPatternStore::new(
            config.history.max_patterns_per_key,
        ));
        let retry = RetryExecutor::new(config.retry.clone());
        let breaker = CircuitBreaker::new(&config.breaker);

        let workflow = WorkflowEngine::new(
            Arc::clone(&analyzer),
            Arc::clone(&scoring),
            Arc::clone(&history),
            retry.clone(),
            breaker.clone(),
            config.workflow.clone(),
        );

        tracing::info!(
            max_iterations = config.workflow.max_iterations,
            max_keywords = config.workflow.max_keywords,
            "orchestrator initialized"
        );

        Self {
            analyzer,
            scoring,
            sessions: SessionStore::new(),
            history,
            workflow,
            retry,
            breaker,
            config,
        }
    }

    /// Start a writing session for a profile and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::Validation`] for a blank user id.
    pub async fn start_session(&self, profile: UserProfile) -> AssistResult<String> {
        if profile.user_id.trim().is_empty() {
            return Err(AssistError::validation("profile user_id cannot be empty"));
        }

        Ok(self.sessions.create(profile))
    }

    /// Analyze an updated draft and return real-time suggestions.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::Validation`] for an empty draft and
    /// [`AssistError::SessionNotFound`] for an unknown session.
    pub async fn update_draft(
        &self,
        session_id: &str,
        draft: &str,
        cursor_position: Option<usize>,
    ) -> AssistResult<SuggestionPayload> {
        self.update_draft_with_cancellation(
            session_id,
            draft,
            cursor_position,
            CancellationToken::new(),
        )
        .await
    }

    /// [`Orchestrator::update_draft`] with cooperative cancellation.
    ///
    /// The workflow checks the token between stages. Independently of
    /// cancellation, a run whose source draft was superseded while it was
    /// executing returns its payload to the caller but is discarded from
    /// session history: last write wins.
    ///
    /// # Errors
    ///
    /// As [`Orchestrator::update_draft`], plus [`AssistError::Cancelled`].
    pub async fn update_draft_with_cancellation(
        &self,
        session_id: &str,
        draft: &str,
        cursor_position: Option<usize>,
        cancel: CancellationToken,
    ) -> AssistResult<SuggestionPayload> {
        if draft.trim().is_empty() {
            return Err(AssistError::validation("draft text cannot be empty"));
        }

        let timer = OpTimer::new("orchestrator", "update_draft").with_session(session_id);

        let (profile, revision) = self.sessions.with_session(session_id, |session| {
            let revision = session.set_draft(draft);
            (session.profile.clone(), revision)
        })?;

        let mut state =
            WorkflowRunState::new(session_id, profile, draft, cursor_position.unwrap_or(0));
        let payload = self.workflow.run(&mut state, &cancel).await?;

        // Last write wins: only the run matching the session's current
        // revision may append to history. The session may also have ended
        // while the run was in flight; the result is dropped either way.
        let applied = self
            .sessions
            .with_session(session_id, |session| {
                if session.draft_revision == revision {
                    session.record_result(payload.clone(), payload.realtime_score.clone());
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false);

        if !applied {
            tracing::debug!(
                session_id,
                revision,
                "draft advanced during analysis, discarding stale result"
            );
        }

        timer.finish();
        Ok(payload)
    }

    /// End a session and return its summary.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::SessionNotFound`] for an unknown id; a
    /// second call on the same id therefore fails.
    pub async fn end_session(&self, session_id: &str) -> AssistResult<SessionSummary> {
        let session = self.sessions.remove(session_id)?;

        let duration = Utc::now().signed_duration_since(session.created_at);
        let summary = SessionSummary {
            duration_seconds: duration.num_milliseconds() as f64 / 1_000.0,
            total_suggestions: session.suggestion_history.len(),
            final_draft_length: session.current_draft.chars().count(),
            average_score: session.average_score(),
        };

        tracing::info!(
            session_id,
            total_suggestions = summary.total_suggestions,
            average_score = summary.average_score,
            "session summary computed"
        );

        Ok(summary)
    }

    /// Analyze a batch of posts (at most 50) and learn keyword patterns
    /// from the results.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::Validation`] for an empty, oversized, or
    /// under-length batch, and [`AssistError::RetryExhausted`] when the
    /// analyzer stays down; this stateless path has no degraded result
    /// worth returning.
    pub async fn analyze_blog_posts(
        &self,
        posts: &[BlogPost],
    ) -> AssistResult<Vec<BlogAnalysisResult>> {
        if posts.is_empty() {
            return Err(AssistError::validation("at least one blog post is required"));
        }
        if posts.len() > MAX_BATCH_POSTS {
            return Err(AssistError::validation(format!(
                "batch size {} exceeds the maximum of {MAX_BATCH_POSTS}",
                posts.len()
            )));
        }
        for post in posts {
            if post.content.trim().chars().count() < MIN_POST_CHARS {
                return Err(AssistError::validation(
                    "blog post content must be at least 10 characters",
                ));
            }
        }

        let timer = OpTimer::new("orchestrator", "analyze_blog_posts");
        let mut results = Vec::with_capacity(posts.len());

        for post in posts {
            let analysis = self
                .retry
                .execute_guarded(&self.breaker, "analyze_blog_post", || {
                    self.analyzer.analyze_blog_post(post)
                })
                .await?;
            let analysis = sanitize_blog_analysis(analysis);

            self.learn_pattern(post, &analysis);

            let word_count = post.word_count();
            results.push(BlogAnalysisResult {
                blog_id: None,
                sentiment: analysis.sentiment,
                key_topics: analysis.key_topics,
                keyword_suggestions: analysis.keyword_suggestions,
                readability_score: analysis.readability_score,
                word_count,
                estimated_reading_time: BlogAnalysisResult::reading_time_minutes(word_count),
            });
        }

        tracing::info!(posts = posts.len(), "batch analysis complete");
        timer.finish();
        Ok(results)
    }

    /// One-shot keyword recommendations, no session involved.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::Validation`] for an empty draft and
    /// [`AssistError::RetryExhausted`] when the analyzer stays down.
    pub async fn recommend_keywords(
        &self,
        draft: &str,
        cursor_context: Option<&str>,
        profile: Option<&UserProfile>,
    ) -> AssistResult<SuggestionPayload> {
        if draft.trim().is_empty() {
            return Err(AssistError::validation("draft text cannot be empty"));
        }

        let analysis = self
            .retry
            .execute_guarded(&self.breaker, "recommend_keywords", || {
                self.analyzer.recommend_keywords(draft, cursor_context, profile)
            })
            .await?;
        let mut analysis = sanitize_keyword_analysis(analysis, draft.len());

        analysis
            .keywords
            .sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        analysis.keywords.truncate(self.config.workflow.max_keywords);

        let breakdown = self.scoring.score_breakdown(draft, profile);

        Ok(SuggestionPayload {
            keywords: analysis.keywords,
            realtime_score: ScoreSnapshot::from(breakdown),
            weak_sections: analysis.weak_sections,
            suggestions_context: "stateless_recommendation".to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Score a text directly with the deterministic engine.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::Validation`] for empty content.
    pub fn calculate_comprehensive_score(
        &self,
        content: &str,
        profile: Option<&UserProfile>,
    ) -> AssistResult<ComprehensiveScore> {
        if content.trim().is_empty() {
            return Err(AssistError::validation("content cannot be empty"));
        }

        Ok(self.scoring.calculate_comprehensive_score(content, profile))
    }

    /// Current orchestrator statistics.
    #[must_use]
    pub fn status(&self) -> OrchestratorStatus {
        OrchestratorStatus {
            active_sessions: self.sessions.len(),
            total_patterns_stored: self.history.total_patterns(),
            analyzer_circuit: self.breaker.state().as_str(),
        }
    }

    /// Component health report.
    #[must_use]
    pub fn health_check(&self) -> HealthReport {
        let circuit = self.breaker.state();
        HealthReport {
            healthy: circuit != CircuitState::Open,
            active_sessions: self.sessions.len(),
            analyzer_circuit: circuit.as_str(),
            last_check: Utc::now(),
        }
    }

    /// Remove sessions idle for longer than `max_idle`; returns the count.
    ///
    /// Never called automatically; hosts schedule this if they want a
    /// TTL on abandoned sessions.
    pub fn cleanup_expired_sessions(&self, max_idle: Duration) -> usize {
        self.sessions.cleanup_expired(max_idle)
    }

    /// Extract a keyword pattern from a batch analysis and store it for
    /// future boosting.
    fn learn_pattern(&self, post: &BlogPost, analysis: &crate::analyzer::BlogAnalysis) {
        let successful_keywords: Vec<String> = analysis
            .keyword_suggestions
            .iter()
            .filter(|k| k.relevance_score > self.config.history.relevance_threshold)
            .map(|k| k.keyword.clone())
            .collect();

        let pattern = HistoricalPattern {
            timestamp: Utc::now(),
            content_length: post.content.chars().count(),
            successful_keywords,
            readability_score: analysis.readability_score,
            topics: analysis.key_topics.iter().map(|t| t.topic.clone()).collect(),
            sentiment: analysis.sentiment.sentiment,
        };

        // Patterns are keyed by author when the post names one; anonymous
        // posts land in the shared general bucket.
        let key = post
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map_or_else(|| HistoricalPatternStore::key_for(None), ToString::to_string);
        self.history.record(&key, pattern);
    }
}
