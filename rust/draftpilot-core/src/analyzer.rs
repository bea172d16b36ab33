//! External text-analyzer boundary.
//!
//! The orchestrator treats the language-model side of the system as an
//! opaque [`TextAnalyzer`] capability: it asks for keyword recommendations
//! on an evolving draft and for whole-post analysis in batch, and never
//! sees prompts, schemas, or response repair. Implementations are expected
//! to be rarely-failing (the real client falls back to a canned response
//! internally), but every call is still retried on transient errors.
//!
//! All numeric fields coming back over this boundary are clamped into
//! their documented ranges by [`sanitize_keyword_analysis`] and
//! [`sanitize_blog_analysis`] before the pipeline consumes them, so an
//! out-of-contract analyzer cannot corrupt scoring. Sanitization is
//! idempotent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    BlogPost, KeyTopic, KeywordSuggestion, SentimentAnalysis, UserProfile, WeakSection,
};
use crate::error::AssistResult;

/// Coarse score hints the analyzer attaches to keyword recommendations.
///
/// These are the analyzer's own estimates; the deterministic scoring engine
/// remains the source of truth for realtime scores. All fields live in
/// [0, 100] after sanitization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreHints {
    /// Overall quality estimate.
    pub overall: f64,
    /// Readability estimate.
    pub readability: f64,
    /// Keyword relevance estimate.
    pub relevance: f64,
    /// Engagement estimate.
    pub engagement: f64,
    /// SEO estimate.
    pub seo: f64,
}

/// Keyword recommendation response for a draft in progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    /// Recommended keywords with relevance metadata.
    pub keywords: Vec<KeywordSuggestion>,
    /// Weak passages the analyzer noticed.
    pub weak_sections: Vec<WeakSection>,
    /// The analyzer's own score estimates.
    pub scores: ScoreHints,
}

impl KeywordAnalysis {
    /// The degraded result recorded when the analyzer is unavailable.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Whole-post analysis response for the batch entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogAnalysis {
    /// Sentiment of the post.
    pub sentiment: SentimentAnalysis,
    /// Extracted key topics.
    pub key_topics: Vec<KeyTopic>,
    /// Suggested keywords.
    pub keyword_suggestions: Vec<KeywordSuggestion>,
    /// Readability estimate in [0, 100] after sanitization.
    pub readability_score: f64,
}

/// Opaque analysis capability backed by an external language model.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the orchestrator shares one
/// analyzer across all concurrent sessions.
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    /// Analyze a complete blog post: sentiment, topics, keywords,
    /// readability.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AssistError::Analyzer`] on transient
    /// failure; the caller retries.
    async fn analyze_blog_post(&self, post: &BlogPost) -> AssistResult<BlogAnalysis>;

    /// Recommend keywords for a draft in progress.
    ///
    /// `cursor_context` is a window of text around the writer's cursor;
    /// `profile` personalizes the recommendations when present.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AssistError::Analyzer`] on transient
    /// failure; the caller retries and degrades to an empty analysis
    /// on exhaustion.
    async fn recommend_keywords(
        &self,
        draft: &str,
        cursor_context: Option<&str>,
        profile: Option<&UserProfile>,
    ) -> AssistResult<KeywordAnalysis>;
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn clamp_hundred(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn sanitize_keywords(keywords: &mut [KeywordSuggestion]) {
    for keyword in keywords {
        keyword.relevance_score = clamp_unit(keyword.relevance_score);
        keyword.semantic_similarity = clamp_unit(keyword.semantic_similarity);
    }
}

fn sanitize_weak_sections(sections: &mut [WeakSection], draft_len: usize) {
    for section in sections {
        section.end_position = section.end_position.min(draft_len);
        section.start_position = section.start_position.min(section.end_position);
        section.confidence = clamp_unit(section.confidence);
    }
}

/// Clamp every numeric field of a keyword analysis into its documented
/// range and repair weak-section ranges against the draft length.
#[must_use]
pub fn sanitize_keyword_analysis(mut analysis: KeywordAnalysis, draft_len: usize) -> KeywordAnalysis {
    sanitize_keywords(&mut analysis.keywords);
    sanitize_weak_sections(&mut analysis.weak_sections, draft_len);

    analysis.scores.overall = clamp_hundred(analysis.scores.overall);
    analysis.scores.readability = clamp_hundred(analysis.scores.readability);
    analysis.scores.relevance = clamp_hundred(analysis.scores.relevance);
    analysis.scores.engagement = clamp_hundred(analysis.scores.engagement);
    analysis.scores.seo = clamp_hundred(analysis.scores.seo);

    analysis
}

/// Clamp every numeric field of a blog analysis into its documented range.
#[must_use]
pub fn sanitize_blog_analysis(mut analysis: BlogAnalysis) -> BlogAnalysis {
    analysis.sentiment.confidence_score = clamp_unit(analysis.sentiment.confidence_score);
    analysis.sentiment.positive_score = clamp_unit(analysis.sentiment.positive_score);
    analysis.sentiment.negative_score = clamp_unit(analysis.sentiment.negative_score);
    analysis.sentiment.neutral_score = clamp_unit(analysis.sentiment.neutral_score);

    for topic in &mut analysis.key_topics {
        topic.relevance_score = clamp_unit(topic.relevance_score);
        topic.frequency = topic.frequency.max(1);
    }

    sanitize_keywords(&mut analysis.keyword_suggestions);
    analysis.readability_score = clamp_hundred(analysis.readability_score);

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueSeverity, Sentiment};

    fn wild_keyword_analysis() -> KeywordAnalysis {
        KeywordAnalysis {
            keywords: vec![KeywordSuggestion {
                keyword: "rust".to_string(),
                relevance_score: 1.7,
                context: "ctx".to_string(),
                position_suggestion: None,
                semantic_similarity: -0.4,
            }],
            weak_sections: vec![WeakSection {
                start_position: 90,
                end_position: 400,
                issue_type: "sentence_too_short".to_string(),
                severity: IssueSeverity::Medium,
                suggestion: "expand".to_string(),
                confidence: 3.0,
            }],
            scores: ScoreHints {
                overall: 250.0,
                readability: -12.0,
                relevance: 55.0,
                engagement: f64::NAN,
                seo: 101.0,
            },
        }
    }

    #[test]
    fn test_keyword_analysis_clamped() {
        let clean = sanitize_keyword_analysis(wild_keyword_analysis(), 100);

        assert!((clean.keywords[0].relevance_score - 1.0).abs() < f64::EPSILON);
        assert!((clean.keywords[0].semantic_similarity - 0.0).abs() < f64::EPSILON);
        assert_eq!(clean.weak_sections[0].end_position, 100);
        assert_eq!(clean.weak_sections[0].start_position, 90);
        assert!((clean.weak_sections[0].confidence - 1.0).abs() < f64::EPSILON);
        assert!((clean.scores.overall - 100.0).abs() < f64::EPSILON);
        assert!((clean.scores.readability - 0.0).abs() < f64::EPSILON);
        assert!((clean.scores.engagement - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weak_section_start_never_exceeds_end() {
        let analysis = KeywordAnalysis {
            weak_sections: vec![WeakSection {
                start_position: 50,
                end_position: 10,
                issue_type: "x".to_string(),
                severity: IssueSeverity::Low,
                suggestion: "y".to_string(),
                confidence: 0.5,
            }],
            ..KeywordAnalysis::default()
        };

        let clean = sanitize_keyword_analysis(analysis, 100);
        assert!(clean.weak_sections[0].start_position <= clean.weak_sections[0].end_position);
        assert_eq!(clean.weak_sections[0].start_position, 10);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_keyword_analysis(wild_keyword_analysis(), 100);
        let twice = sanitize_keyword_analysis(once.clone(), 100);

        let a = serde_json::to_value(&once).expect("serialize");
        let b = serde_json::to_value(&twice).expect("serialize");
        assert_eq!(a, b);
    }

    #[test]
    fn test_blog_analysis_clamped() {
        let analysis = BlogAnalysis {
            sentiment: SentimentAnalysis {
                sentiment: Sentiment::Positive,
                confidence_score: 2.0,
                positive_score: 1.5,
                negative_score: -1.0,
                neutral_score: 0.2,
            },
            key_topics: vec![KeyTopic {
                topic: "testing".to_string(),
                relevance_score: 9.0,
                frequency: 0,
            }],
            keyword_suggestions: Vec::new(),
            readability_score: 180.0,
        };

        let clean = sanitize_blog_analysis(analysis);
        assert!((clean.sentiment.confidence_score - 1.0).abs() < f64::EPSILON);
        assert!((clean.sentiment.negative_score - 0.0).abs() < f64::EPSILON);
        assert_eq!(clean.key_topics[0].frequency, 1);
        assert!((clean.readability_score - 100.0).abs() < f64::EPSILON);
    }
}
