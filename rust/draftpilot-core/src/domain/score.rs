//! Score breakdown and the fixed factor weighting.

use serde::{Deserialize, Serialize};

/// Weight of keyword relevance in the overall score.
const WEIGHT_KEYWORD_RELEVANCE: f64 = 0.25;
/// Weight of readability.
const WEIGHT_READABILITY: f64 = 0.20;
/// Weight of user-profile alignment.
const WEIGHT_PROFILE_ALIGNMENT: f64 = 0.15;
/// Weight of content structure.
const WEIGHT_CONTENT_STRUCTURE: f64 = 0.15;
/// Weight of SEO optimization.
const WEIGHT_SEO_OPTIMIZATION: f64 = 0.15;
/// Weight of engagement potential. The six weights sum to 1.0.
const WEIGHT_ENGAGEMENT_POTENTIAL: f64 = 0.10;

/// Clamp a factor or overall score into [0, 100].
#[must_use]
pub(crate) fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Six-factor content score, each factor in [0, 100].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Keyword density, variety, and topic fit.
    pub keyword_relevance: f64,
    /// Flesch-style readability with structural adjustments.
    pub readability: f64,
    /// Alignment with the writer's profile.
    pub user_profile_alignment: f64,
    /// Paragraph, sentence, and heading organization.
    pub content_structure: f64,
    /// Length, density, meta-content, and markup signals.
    pub seo_optimization: f64,
    /// Questions, calls to action, emotional and personal language.
    pub engagement_potential: f64,
}

impl ScoreBreakdown {
    /// Overall score: the fixed weighted sum of the six factors,
    /// clamped into [0, 100].
    #[must_use]
    pub fn overall(&self) -> f64 {
        clamp_score(
            self.keyword_relevance * WEIGHT_KEYWORD_RELEVANCE
                + self.readability * WEIGHT_READABILITY
                + self.user_profile_alignment * WEIGHT_PROFILE_ALIGNMENT
                + self.content_structure * WEIGHT_CONTENT_STRUCTURE
                + self.seo_optimization * WEIGHT_SEO_OPTIMIZATION
                + self.engagement_potential * WEIGHT_ENGAGEMENT_POTENTIAL,
        )
    }

    /// Clamp every factor into [0, 100].
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            keyword_relevance: clamp_score(self.keyword_relevance),
            readability: clamp_score(self.readability),
            user_profile_alignment: clamp_score(self.user_profile_alignment),
            content_structure: clamp_score(self.content_structure),
            seo_optimization: clamp_score(self.seo_optimization),
            engagement_potential: clamp_score(self.engagement_potential),
        }
    }

    /// Factors in declaration order, for weight-invariant checks and
    /// iteration-order-sensitive consumers.
    #[must_use]
    pub fn factors(&self) -> [f64; 6] {
        [
            self.keyword_relevance,
            self.readability,
            self.user_profile_alignment,
            self.content_structure,
            self.seo_optimization,
            self.engagement_potential,
        ]
    }

    /// The fixed factor weights, in declaration order.
    #[must_use]
    pub const fn weights() -> [f64; 6] {
        [
            WEIGHT_KEYWORD_RELEVANCE,
            WEIGHT_READABILITY,
            WEIGHT_PROFILE_ALIGNMENT,
            WEIGHT_CONTENT_STRUCTURE,
            WEIGHT_SEO_OPTIMIZATION,
            WEIGHT_ENGAGEMENT_POTENTIAL,
        ]
    }
}

/// A scored moment in a session: the overall value plus its breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    /// Weighted overall score in [0, 100].
    pub overall_score: f64,
    /// The six contributing factors.
    pub breakdown: ScoreBreakdown,
}

impl From<ScoreBreakdown> for ScoreSnapshot {
    fn from(breakdown: ScoreBreakdown) -> Self {
        Self {
            overall_score: breakdown.overall(),
            breakdown,
        }
    }
}
