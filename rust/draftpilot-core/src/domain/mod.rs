//! Core domain models shared across the scoring and workflow layers.
//!
//! Everything here is a fixed-shape serde record; ranges named in the field
//! docs are enforced at the analyzer boundary (see [`crate::analyzer`]) and
//! by the scoring engine's clamping, not by the types themselves.

pub mod content;
pub mod profile;
pub mod score;
pub mod suggestion;

pub use content::{BlogAnalysisResult, BlogPost, KeyTopic, Sentiment, SentimentAnalysis};
pub use profile::{ReadingLevel, UserProfile, WritingStyle};
pub use score::{ScoreBreakdown, ScoreSnapshot};
pub use suggestion::{
    IssueSeverity, KeywordSuggestion, SessionSummary, SuggestionPayload, WeakSection,
};
