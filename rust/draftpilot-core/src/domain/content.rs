//! Blog posts and batch-analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::suggestion::KeywordSuggestion;

/// Words per minute assumed when estimating reading time.
const READING_WORDS_PER_MINUTE: usize = 200;

/// A blog post submitted for batch analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    /// Post title, when known.
    #[serde(default)]
    pub title: Option<String>,

    /// Post body.
    pub content: String,

    /// Author-assigned tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Author identifier, when known.
    #[serde(default)]
    pub author: Option<String>,

    /// Publication timestamp, when known.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    /// Create a post from body text alone.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: content.into(),
            tags: Vec::new(),
            author: None,
            created_at: None,
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whitespace-delimited word count of the body.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Overall sentiment of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Predominantly positive tone.
    Positive,
    /// Predominantly negative tone.
    Negative,
    /// Mixed or flat tone.
    #[default]
    Neutral,
}

impl Sentiment {
    /// String form used in stored patterns and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// Sentiment analysis result from the analyzer.
///
/// All score fields live in [0, 1] after sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    /// Dominant sentiment label.
    pub sentiment: Sentiment,
    /// Confidence in the dominant label.
    pub confidence_score: f64,
    /// Positive component.
    pub positive_score: f64,
    /// Negative component.
    pub negative_score: f64,
    /// Neutral component.
    pub neutral_score: f64,
}

impl Default for SentimentAnalysis {
    fn default() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence_score: 0.0,
            positive_score: 0.0,
            negative_score: 0.0,
            neutral_score: 1.0,
        }
    }
}

/// A key topic extracted from a text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyTopic {
    /// Topic label.
    pub topic: String,
    /// Relevance in [0, 1] after sanitization.
    pub relevance_score: f64,
    /// Occurrences observed, at least 1.
    pub frequency: u32,
}

/// Full analysis of one blog post, as returned by the batch entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogAnalysisResult {
    /// Identifier of the analyzed post, when the caller supplied one.
    #[serde(default)]
    pub blog_id: Option<String>,

    /// Sentiment of the post.
    pub sentiment: SentimentAnalysis,

    /// Extracted key topics.
    pub key_topics: Vec<KeyTopic>,

    /// Suggested keywords with relevance metadata.
    pub keyword_suggestions: Vec<KeywordSuggestion>,

    /// Readability in [0, 100] after sanitization.
    pub readability_score: f64,

    /// Whitespace-delimited word count of the post body.
    pub word_count: usize,

    /// Estimated reading time in whole minutes, at least 1.
    pub estimated_reading_time: u32,
}

impl BlogAnalysisResult {
    /// Estimate reading time for a word count.
    #[must_use]
    pub fn reading_time_minutes(word_count: usize) -> u32 {
        let minutes = word_count.div_ceil(READING_WORDS_PER_MINUTE);
        u32::try_from(minutes.max(1)).unwrap_or(u32::MAX)
    }
}
