//! Profile-alignment factor: topics, style, expertise, audience.

use crate::domain::{UserProfile, WritingStyle};

/// Score returned when no profile is available.
const NEUTRAL_SCORE: f64 = 50.0;

/// Connectives typical of formal prose.
const FORMAL_INDICATORS: &[&str] = &[
    "therefore",
    "furthermore",
    "however",
    "moreover",
    "consequently",
];

/// Contractions typical of casual prose.
const CASUAL_INDICATORS: &[&str] = &["don't", "won't", "can't", "it's", "we're", "you'll", "i'll"];

/// Formal connectives counted against casual writing.
const CASUAL_COUNTER_INDICATORS: &[&str] = &["therefore", "furthermore", "however", "moreover"];

/// Vocabulary typical of technical writing.
const TECHNICAL_INDICATORS: &[&str] = &[
    "algorithm",
    "implementation",
    "methodology",
    "analysis",
    "optimization",
];

/// Vocabulary typical of creative writing.
const CREATIVE_INDICATORS: &[&str] = &["imagine", "picture", "story", "metaphor", "analogy"];

/// Keyword categories for the five audience archetypes.
const AUDIENCE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "beginner",
        &["learn", "start", "basic", "simple", "easy", "introduction"],
    ),
    (
        "professional",
        &["strategy", "business", "professional", "industry", "market"],
    ),
    (
        "technical",
        &[
            "technical",
            "system",
            "implementation",
            "configuration",
            "development",
        ],
    ),
    (
        "academic",
        &["research", "study", "analysis", "theory", "methodology"],
    ),
    ("general", &["help", "guide", "tips", "advice", "useful"]),
];

/// Discount applied when only the generic audience category matches.
const GENERAL_AUDIENCE_DISCOUNT: f64 = 0.7;

fn count_contained(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|n| haystack.contains(*n)).count()
}

/// Profile-alignment score in [0, 100]; neutral 50 without a profile.
pub(crate) fn score(content: &str, profile: Option<&UserProfile>) -> f64 {
    let Some(profile) = profile else {
        return NEUTRAL_SCORE;
    };

    let content_lower = content.to_lowercase();
    let mut scores: Vec<f64> = Vec::new();

    if !profile.preferred_topics.is_empty() {
        let matches = profile
            .preferred_topics
            .iter()
            .filter(|t| content_lower.contains(&t.to_lowercase()))
            .count();
        let ratio = matches as f64 / profile.preferred_topics.len() as f64;
        scores.push((ratio * 100.0).min(100.0));
    }

    scores.push(style_alignment(&content_lower, profile.writing_style));

    if !profile.expertise_areas.is_empty() {
        let matches = profile
            .expertise_areas
            .iter()
            .filter(|a| content_lower.contains(&a.to_lowercase()))
            .count();
        let ratio = matches as f64 / profile.expertise_areas.len() as f64;
        scores.push((ratio * 100.0).min(100.0));
    }

    if let Some(target) = profile.target_audience.as_deref() {
        scores.push(audience_alignment(&content_lower, target));
    }

    let average = scores.iter().sum::<f64>() / scores.len() as f64;
    average.clamp(0.0, 100.0)
}

/// Indicator-word alignment for each writing style. Boosts and penalties
/// are asymmetric on purpose: the counter-signal costs less than the
/// matching signal earns.
fn style_alignment(content_lower: &str, style: WritingStyle) -> f64 {
    match style {
        WritingStyle::Formal => {
            let formal = count_contained(content_lower, FORMAL_INDICATORS) as f64;
            let informal = count_contained(content_lower, &CASUAL_INDICATORS[..5]) as f64;
            (50.0 + formal * 10.0 - informal * 5.0).max(0.0)
        }
        WritingStyle::Casual => {
            let casual = count_contained(content_lower, CASUAL_INDICATORS) as f64;
            let formal = count_contained(content_lower, CASUAL_COUNTER_INDICATORS) as f64;
            (50.0 + casual * 8.0 - formal * 5.0).max(0.0)
        }
        WritingStyle::Technical => {
            let technical = count_contained(content_lower, TECHNICAL_INDICATORS) as f64;
            (50.0 + technical * 15.0).min(100.0)
        }
        WritingStyle::Creative => {
            let creative = count_contained(content_lower, CREATIVE_INDICATORS) as f64;
            (50.0 + creative * 12.0).min(100.0)
        }
    }
}

/// Keyword-category match against the audience archetypes. The target
/// matches a category by substring; the generic category contributes a
/// discounted fallback score.
fn audience_alignment(content_lower: &str, target_audience: &str) -> f64 {
    let target_lower = target_audience.to_lowercase();
    let mut best: f64 = 0.0;

    for (audience_type, keywords) in AUDIENCE_KEYWORDS {
        let matches = count_contained(content_lower, keywords);
        let match_score = ((matches * 20) as f64).min(100.0);

        if audience_type.contains(&target_lower) {
            best = best.max(match_score);
        } else if *audience_type == "general" {
            best = best.max(match_score * GENERAL_AUDIENCE_DISCOUNT);
        }
    }

    best
}
