//! Engagement factor: questions, calls to action, emotional and personal
//! language.

use super::text::TextTools;

/// Positive emotional vocabulary.
const POSITIVE_WORDS: &[&str] = &[
    "amazing",
    "excellent",
    "fantastic",
    "great",
    "wonderful",
    "inspiring",
    "motivating",
    "exciting",
    "incredible",
    "outstanding",
];

/// Negative emotional vocabulary. Both polarities count toward
/// engagement; flat prose is the thing being penalized.
const NEGATIVE_WORDS: &[&str] = &[
    "problem",
    "challenge",
    "difficult",
    "struggle",
    "issue",
    "mistake",
    "error",
    "failure",
    "wrong",
    "bad",
];

/// Engagement score in [0, 100]: equal-weighted mean of four signals.
pub(crate) fn score(tools: &TextTools, content: &str) -> f64 {
    let word_count = tools.extract_words(content).len();

    // Questions per 100 words; two per 100 is the sweet spot.
    let question_count = content.matches('?').count();
    let questions_per_block = question_count as f64 / (word_count as f64 / 100.0).max(1.0);
    let question_score = (questions_per_block * 50.0).min(100.0);

    // Call-to-action phrasing.
    let cta_count = tools.cta_re.find_iter(content).count();
    let cta_score = ((cta_count * 25) as f64).min(100.0);

    // Emotional vocabulary, both polarities, each word counted once.
    let content_lower = content.to_lowercase();
    let emotional_count = POSITIVE_WORDS
        .iter()
        .chain(NEGATIVE_WORDS)
        .filter(|w| content_lower.contains(*w))
        .count();
    let emotional_score = ((emotional_count * 10) as f64).min(100.0);

    // Personal pronouns create reader connection.
    let pronoun_count = tools.pronoun_re.find_iter(content).count();
    let pronoun_score = ((pronoun_count * 5) as f64).min(100.0);

    let average = (question_score + cta_score + emotional_score + pronoun_score) / 4.0;
    average.clamp(0.0, 100.0)
}
