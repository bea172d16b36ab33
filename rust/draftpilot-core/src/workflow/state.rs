//! Workflow stages and per-run state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::KeywordAnalysis;
use crate::domain::{
    KeywordSuggestion, ScoreBreakdown, SuggestionPayload, UserProfile, WeakSection,
};

/// Pipeline stages for one draft update.
///
/// Every stage but the last transition is unconditional; the only
/// conditional edge is `Finalize -> {AnalyzeDraft, Done}`, decided by
/// [`super::engine::WorkflowEngine::should_iterate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Ask the analyzer about the current draft.
    AnalyzeDraft,
    /// Boost analyzer keywords with historical patterns.
    GenerateKeywords,
    /// Run the deterministic scoring engine.
    ScoreContent,
    /// Scan the draft for weak passages.
    IdentifyWeaknesses,
    /// Apply contextual boosts and keep the best keywords.
    RefineSuggestions,
    /// Assemble the payload and decide whether to loop.
    Finalize,
    /// Terminal state.
    Done,
}

impl Stage {
    /// The statically declared unconditional transition table.
    ///
    /// `Finalize` maps to `Done` here; the loop-back to `AnalyzeDraft`
    /// is the engine's conditional edge.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::AnalyzeDraft => Self::GenerateKeywords,
            Self::GenerateKeywords => Self::ScoreContent,
            Self::ScoreContent => Self::IdentifyWeaknesses,
            Self::IdentifyWeaknesses => Self::RefineSuggestions,
            Self::RefineSuggestions => Self::Finalize,
            Self::Finalize | Self::Done => Self::Done,
        }
    }

    /// Stage name for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnalyzeDraft => "analyze_draft",
            Self::GenerateKeywords => "generate_keywords",
            Self::ScoreContent => "score_content",
            Self::IdentifyWeaknesses => "identify_weaknesses",
            Self::RefineSuggestions => "refine_suggestions",
            Self::Finalize => "finalize",
            Self::Done => "done",
        }
    }
}

/// One analyzer pass over the draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// When the analysis ran.
    pub timestamp: DateTime<Utc>,
    /// The (sanitized) analyzer response; empty when the analyzer was
    /// unavailable.
    pub analysis: KeywordAnalysis,
    /// Character length of the draft at analysis time; feeds the
    /// significant-change predicate.
    pub draft_length: usize,
    /// Weak sections attached by the weakness scan.
    pub weak_sections: Vec<WeakSection>,
}

/// One keyword-suggestion pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRecord {
    /// When the suggestions were produced.
    pub timestamp: DateTime<Utc>,
    /// Historically boosted keywords.
    pub keywords: Vec<KeywordSuggestion>,
    /// Contextually refined keywords, set by the refinement stage.
    pub refined_keywords: Option<Vec<KeywordSuggestion>>,
    /// Which enrichment produced this set.
    pub context: String,
}

/// Transient state for one draft-update run. Built fresh per update and
/// dropped when the final payload is returned; the loop-local histories
/// exist only to feed the change-detection predicate and the payload.
#[derive(Debug, Clone)]
pub struct WorkflowRunState {
    /// Session this run belongs to.
    pub session_id: String,
    /// Profile snapshot taken at update time.
    pub profile: UserProfile,
    /// Draft snapshot being analyzed.
    pub draft: String,
    /// Cursor position within the draft, in characters.
    pub cursor_position: usize,
    /// One record per analysis pass, oldest first.
    pub analysis_history: Vec<AnalysisRecord>,
    /// One record per keyword pass, oldest first.
    pub suggestion_history: Vec<SuggestionRecord>,
    /// Breakdown from the most recent scoring stage.
    pub current_score: Option<ScoreBreakdown>,
    /// Completed analysis passes.
    pub iteration_count: u32,
    /// Last stage-completion timestamp.
    pub last_updated: DateTime<Utc>,
    /// Payload assembled by the terminal stage.
    pub final_payload: Option<SuggestionPayload>,
}

impl WorkflowRunState {
    /// Build the run state for one update call.
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        profile: UserProfile,
        draft: impl Into<String>,
        cursor_position: usize,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            profile,
            draft: draft.into(),
            cursor_position,
            analysis_history: Vec::new(),
            suggestion_history: Vec::new(),
            current_score: None,
            iteration_count: 0,
            last_updated: Utc::now(),
            final_payload: None,
        }
    }

    /// Character length of the draft snapshot.
    #[must_use]
    pub fn draft_chars(&self) -> usize {
        self.draft.chars().count()
    }
}
