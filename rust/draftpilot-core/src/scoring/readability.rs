//! Readability factor: Flesch-style base score plus structural signals.

use crate::domain::{ReadingLevel, UserProfile};

use super::text::TextTools;

/// Weight of the Flesch base score in the combined factor.
const WEIGHT_FLESCH: f64 = 0.5;
/// Weight of paragraph structure.
const WEIGHT_PARAGRAPHS: f64 = 0.2;
/// Weight of punctuation usage.
const WEIGHT_PUNCTUATION: f64 = 0.15;
/// Weight of average word length.
const WEIGHT_WORD_LENGTH: f64 = 0.15;

/// Readability score in [0, 100].
pub(crate) fn score(tools: &TextTools, content: &str, profile: Option<&UserProfile>) -> f64 {
    let sentences = tools.count_sentences(content);
    let words = tools.extract_words(content);

    if sentences == 0 || words.is_empty() {
        return 0.0;
    }

    let syllables: usize = words.iter().map(|w| TextTools::count_syllables(w)).sum();
    let avg_sentence_length = words.len() as f64 / sentences as f64;
    let avg_syllables_per_word = syllables as f64 / words.len() as f64;

    // Flesch Reading Ease, normalized into [0, 100].
    let flesch = (206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables_per_word)
        .clamp(0.0, 100.0);

    let paragraph = paragraph_structure_score(tools, content);
    let punctuation = punctuation_score(content, words.len());
    let word_length = word_length_score(&words);

    // Readers at the extremes pull the target in opposite directions:
    // beginners reward easy prose, advanced readers reward density.
    let adjustment = match profile.map(|p| p.reading_level) {
        Some(ReadingLevel::Beginner) if flesch < 60.0 => (60.0 - flesch) * 0.5,
        Some(ReadingLevel::Advanced) if flesch > 40.0 => (flesch - 40.0) * 0.3,
        _ => 0.0,
    };

    let combined = flesch * WEIGHT_FLESCH
        + paragraph * WEIGHT_PARAGRAPHS
        + punctuation * WEIGHT_PUNCTUATION
        + word_length * WEIGHT_WORD_LENGTH
        + adjustment;

    combined.clamp(0.0, 100.0)
}

/// Ideal paragraphs run 3-8 sentences; shorter or longer is penalized
/// linearly. Mean across paragraphs.
fn paragraph_structure_score(tools: &TextTools, content: &str) -> f64 {
    let paragraphs: Vec<&str> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if paragraphs.is_empty() {
        return 0.0;
    }

    let total: f64 = paragraphs
        .iter()
        .map(|para| {
            let sentence_count = tools.count_sentences(para);
            if (3..=8).contains(&sentence_count) {
                100.0
            } else if sentence_count < 3 {
                sentence_count as f64 * 33.3
            } else {
                (100.0 - (sentence_count as f64 - 8.0) * 10.0).max(0.0)
            }
        })
        .sum();

    total / paragraphs.len() as f64
}

/// Ideal punctuation-to-word ratio is 0.10-0.30.
fn punctuation_score(content: &str, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }

    let punct_count = content
        .chars()
        .filter(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'))
        .count();
    let ratio = punct_count as f64 / word_count as f64;

    if (0.1..=0.3).contains(&ratio) {
        100.0
    } else if ratio < 0.1 {
        (ratio / 0.1) * 100.0
    } else {
        (100.0 - (ratio - 0.3) * 200.0).max(0.0)
    }
}

/// Ideal average word length is 4-7 characters.
fn word_length_score(words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }

    let avg = words.iter().map(String::len).sum::<usize>() as f64 / words.len() as f64;

    if (4.0..=7.0).contains(&avg) {
        100.0
    } else if avg < 4.0 {
        (avg / 4.0) * 100.0
    } else {
        (100.0 - (avg - 7.0) * 20.0).max(0.0)
    }
}
