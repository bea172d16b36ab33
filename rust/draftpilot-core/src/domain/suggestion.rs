//! Keyword suggestions, weak sections, and the per-update payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::score::ScoreSnapshot;

/// A suggested keyword with relevance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSuggestion {
    /// The keyword text.
    pub keyword: String,

    /// Relevance in [0, 1] after sanitization.
    pub relevance_score: f64,

    /// Snippet showing where the keyword fits.
    pub context: String,

    /// Suggested character position for insertion, when known.
    #[serde(default)]
    pub position_suggestion: Option<usize>,

    /// Semantic similarity to the draft in [0, 1] after sanitization.
    pub semantic_similarity: f64,
}

/// Severity of a detected weakness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Cosmetic; safe to ignore.
    Low,
    /// Worth fixing.
    Medium,
    /// Undermines the draft.
    High,
}

impl IssueSeverity {
    /// String form used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A weak passage in the draft, as a half-open byte range `[start, end)`.
///
/// Positions come from a first-occurrence search, so a short fragment that
/// repeats verbatim is attributed to its first occurrence. That is an
/// accepted approximation, not something callers should try to correct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakSection {
    /// Byte offset where the weak passage starts.
    pub start_position: usize,
    /// Byte offset one past the end of the weak passage.
    pub end_position: usize,
    /// Machine-readable issue tag (e.g. `sentence_too_short`).
    pub issue_type: String,
    /// How much the passage hurts the draft.
    pub severity: IssueSeverity,
    /// Human-readable fix suggestion.
    pub suggestion: String,
    /// Detector confidence in [0, 1] after sanitization.
    pub confidence: f64,
}

/// Everything one draft update produces: refined keywords, the current
/// score, flagged weaknesses, and loop bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionPayload {
    /// Refined keyword suggestions, highest relevance first.
    pub keywords: Vec<KeywordSuggestion>,
    /// Score at the time of this update.
    pub realtime_score: ScoreSnapshot,
    /// Weak passages found in the draft.
    pub weak_sections: Vec<WeakSection>,
    /// Which analysis pass produced this payload.
    pub suggestions_context: String,
    /// When the payload was assembled.
    pub timestamp: DateTime<Utc>,
}

/// Summary returned when a session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Wall-clock session length in seconds.
    pub duration_seconds: f64,
    /// Number of suggestion payloads delivered.
    pub total_suggestions: usize,
    /// Character length of the final draft.
    pub final_draft_length: usize,
    /// Mean overall score across the session, 0.0 when never scored.
    pub average_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serde() {
        let severity: IssueSeverity = serde_json::from_str("\"medium\"").expect("deserialize");
        assert_eq!(severity, IssueSeverity::Medium);
        assert_eq!(severity.as_str(), "medium");
    }

    #[test]
    fn test_payload_serde_round_trip() {
        let payload = SuggestionPayload {
            keywords: vec![KeywordSuggestion {
                keyword: "rust".to_string(),
                relevance_score: 0.9,
                context: "systems programming in rust".to_string(),
                position_suggestion: Some(10),
                semantic_similarity: 0.8,
            }],
            realtime_score: ScoreSnapshot::from(crate::domain::ScoreBreakdown::default()),
            weak_sections: Vec::new(),
            suggestions_context: "Analysis iteration 0".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&payload).expect("serialize");
        let back: SuggestionPayload = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.keywords.len(), 1);
        assert_eq!(back.keywords[0].keyword, "rust");
        assert_eq!(back.suggestions_context, "Analysis iteration 0");
    }
}
