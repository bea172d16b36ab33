//! Multi-factor content scoring engine.
//!
//! Pure text analysis, no external calls: six independent sub-scores
//! (keyword relevance, readability, profile alignment, structure, SEO,
//! engagement), each clamped to [0, 100], combined with fixed weights
//! into an overall score, plus threshold-gated recommendations. The
//! heuristics are intentionally approximate; determinism matters more
//! than linguistic rigor here, because the workflow reruns scoring on
//! every draft update and diffs the results.

mod alignment;
mod engagement;
mod readability;
mod recommend;
mod seo;
mod structure;
mod text;

use serde::{Deserialize, Serialize};

use crate::domain::{ScoreBreakdown, UserProfile};

use self::text::TextTools;

/// Weights for the keyword-relevance sub-signals.
const WEIGHT_DENSITY: f64 = 0.4;
const WEIGHT_VARIETY: f64 = 0.35;
const WEIGHT_PROFILE_RELEVANCE: f64 = 0.25;

/// Full scoring result: overall value, per-factor breakdown, and advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveScore {
    /// Weighted overall score in [0, 100].
    pub overall_score: f64,
    /// The six contributing factors.
    pub breakdown: ScoreBreakdown,
    /// Actionable recommendations, highest priority first, at most eight.
    pub recommendations: Vec<String>,
}

/// Deterministic, profile-aware content scorer.
#[derive(Debug)]
pub struct ScoringEngine {
    tools: TextTools,
}

impl ScoringEngine {
    /// Create an engine; compiles its text patterns once.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: TextTools::new(),
        }
    }

    /// Compute the six-factor breakdown for a text.
    #[must_use]
    pub fn score_breakdown(
        &self,
        content: &str,
        profile: Option<&UserProfile>,
    ) -> ScoreBreakdown {
        ScoreBreakdown {
            keyword_relevance: self.keyword_relevance(content, profile),
            readability: readability::score(&self.tools, content, profile),
            user_profile_alignment: alignment::score(content, profile),
            content_structure: structure::score(&self.tools, content),
            seo_optimization: seo::score(&self.tools, content),
            engagement_potential: engagement::score(&self.tools, content),
        }
        .clamped()
    }

    /// Compute the breakdown, overall score, and recommendations for a text.
    #[must_use]
    pub fn calculate_comprehensive_score(
        &self,
        content: &str,
        profile: Option<&UserProfile>,
    ) -> ComprehensiveScore {
        let breakdown = self.score_breakdown(content, profile);
        let overall_score = breakdown.overall();
        let word_count = self.tools.extract_words(content).len();
        let recommendations = recommend::generate(&breakdown, word_count, profile);

        tracing::debug!(
            overall_score,
            recommendations = recommendations.len(),
            "content scored"
        );

        ComprehensiveScore {
            overall_score,
            breakdown,
            recommendations,
        }
    }

    /// Keyword relevance: density near 2% of the word pool, keyword
    /// variety, and preferred-topic matches.
    fn keyword_relevance(&self, content: &str, profile: Option<&UserProfile>) -> f64 {
        let words = self.tools.extract_words(content);
        if words.is_empty() {
            return 0.0;
        }

        let keywords = self.tools.potential_keywords(&words);
        let density = keywords.len() as f64 / words.len() as f64 * 100.0;
        let density_score = (100.0 * (1.0 - (density - 2.0).abs() / 10.0)).clamp(0.0, 100.0);

        let unique_keywords = keywords
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len();
        let variety_score = ((unique_keywords * 5) as f64).min(100.0);

        let profile_relevance = match profile {
            Some(p) if !p.preferred_topics.is_empty() => {
                let content_lower = content.to_lowercase();
                let matches = p
                    .preferred_topics
                    .iter()
                    .filter(|t| content_lower.contains(&t.to_lowercase()))
                    .count();
                ((matches * 25) as f64).min(100.0)
            }
            _ => 50.0,
        };

        let combined = density_score * WEIGHT_DENSITY
            + variety_score * WEIGHT_VARIETY
            + profile_relevance * WEIGHT_PROFILE_RELEVANCE;
        combined.clamp(0.0, 100.0)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}
