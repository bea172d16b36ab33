//! Recommendation rules derived from the score breakdown.

use crate::domain::{ReadingLevel, ScoreBreakdown, UserProfile, WritingStyle};

/// Factor value below which a recommendation fires.
const RECOMMENDATION_THRESHOLD: f64 = 60.0;

/// Most recommendations returned per scoring pass.
const MAX_RECOMMENDATIONS: usize = 8;

/// Word count under which the expand-content advice fires.
const MIN_SEO_WORDS: usize = 800;

/// Generate actionable recommendations, highest priority first.
///
/// Rules fire in factor declaration order and the list is truncated to
/// eight entries, so low-priority advice drops off when many factors
/// score poorly at once.
pub(crate) fn generate(
    breakdown: &ScoreBreakdown,
    word_count: usize,
    profile: Option<&UserProfile>,
) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    if breakdown.keyword_relevance < RECOMMENDATION_THRESHOLD {
        recommendations
            .push("Consider adding more relevant keywords related to your main topic".to_string());
        if let Some(profile) = profile {
            if !profile.preferred_topics.is_empty() {
                let topics: Vec<&str> = profile
                    .preferred_topics
                    .iter()
                    .take(3)
                    .map(String::as_str)
                    .collect();
                recommendations
                    .push(format!("Include keywords related to: {}", topics.join(", ")));
            }
        }
    }

    if breakdown.readability < RECOMMENDATION_THRESHOLD {
        recommendations
            .push("Improve readability by using shorter sentences and simpler words".to_string());
        recommendations
            .push("Break up long paragraphs into smaller, more digestible chunks".to_string());
    }

    if breakdown.content_structure < RECOMMENDATION_THRESHOLD {
        recommendations
            .push("Improve content structure with clear headings and logical flow".to_string());
        recommendations
            .push("Ensure paragraphs are 3-8 sentences long for optimal readability".to_string());
    }

    if breakdown.seo_optimization < RECOMMENDATION_THRESHOLD {
        if word_count < MIN_SEO_WORDS {
            recommendations
                .push("Consider expanding content to 800-2000 words for better SEO".to_string());
        }
        recommendations
            .push("Add meta descriptions, headings, and optimize keyword density".to_string());
    }

    if breakdown.engagement_potential < RECOMMENDATION_THRESHOLD {
        recommendations.push("Add questions to encourage reader engagement".to_string());
        recommendations.push("Include calls-to-action to drive user interaction".to_string());
        recommendations
            .push("Use more personal pronouns (you, we, us) to connect with readers".to_string());
    }

    if let Some(profile) = profile {
        if breakdown.user_profile_alignment < RECOMMENDATION_THRESHOLD {
            match profile.writing_style {
                WritingStyle::Formal => recommendations
                    .push("Use more formal language and avoid contractions".to_string()),
                WritingStyle::Casual => recommendations.push(
                    "Adopt a more conversational tone with contractions and informal language"
                        .to_string(),
                ),
                WritingStyle::Technical | WritingStyle::Creative => {}
            }

            match profile.reading_level {
                ReadingLevel::Beginner => recommendations
                    .push("Simplify vocabulary and explain technical terms".to_string()),
                ReadingLevel::Advanced => recommendations.push(
                    "Include more sophisticated vocabulary and complex concepts".to_string(),
                ),
                ReadingLevel::Intermediate => {}
            }
        }
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn low_breakdown() -> ScoreBreakdown {
        ScoreBreakdown {
            keyword_relevance: 10.0,
            readability: 10.0,
            user_profile_alignment: 10.0,
            content_structure: 10.0,
            seo_optimization: 10.0,
            engagement_potential: 10.0,
        }
    }

    fn high_breakdown() -> ScoreBreakdown {
        ScoreBreakdown {
            keyword_relevance: 90.0,
            readability: 90.0,
            user_profile_alignment: 90.0,
            content_structure: 90.0,
            seo_optimization: 90.0,
            engagement_potential: 90.0,
        }
    }

    #[test]
    fn test_high_scores_produce_no_recommendations() {
        assert!(generate(&high_breakdown(), 1_000, None).is_empty());
    }

    #[test]
    fn test_truncated_to_eight() {
        let profile = UserProfile::new("u")
            .with_topics(vec!["rust".to_string()])
            .with_reading_level(ReadingLevel::Beginner);
        let recommendations = generate(&low_breakdown(), 100, Some(&profile));
        assert_eq!(recommendations.len(), 8);
    }

    #[test]
    fn test_factor_declaration_order() {
        let recommendations = generate(&low_breakdown(), 100, None);
        assert!(recommendations[0].contains("keywords"));
        assert!(recommendations[1].contains("readability"));
    }

    #[test]
    fn test_seo_expand_advice_only_below_word_floor() {
        let mut breakdown = high_breakdown();
        breakdown.seo_optimization = 20.0;

        let short = generate(&breakdown, 100, None);
        assert!(short.iter().any(|r| r.contains("expanding content")));

        let long = generate(&breakdown, 1_500, None);
        assert!(!long.iter().any(|r| r.contains("expanding content")));
    }

    #[test]
    fn test_profile_specific_advice() {
        let mut breakdown = high_breakdown();
        breakdown.user_profile_alignment = 30.0;

        let formal = UserProfile::new("u").with_writing_style(WritingStyle::Formal);
        let recommendations = generate(&breakdown, 1_000, Some(&formal));
        assert!(recommendations.iter().any(|r| r.contains("formal language")));

        let advanced = UserProfile::new("u").with_reading_level(ReadingLevel::Advanced);
        let recommendations = generate(&breakdown, 1_000, Some(&advanced));
        assert!(recommendations.iter().any(|r| r.contains("sophisticated")));
    }
}
