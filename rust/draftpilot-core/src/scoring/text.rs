//! Shared text extraction utilities for the scoring factors.
//!
//! Tokenization is intentionally simple: alphabetic runs, a fixed stop-word
//! list, and a vowel-group syllable estimate. The factors built on top are
//! approximate by design, not linguistically rigorous.

use std::collections::HashSet;

use regex::Regex;

/// Stop words excluded from the scoring word pool.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
    "i", "you", "he", "she", "it", "we", "they",
];

/// Words longer than this count as potential keywords.
const KEYWORD_MIN_LEN: usize = 3;

/// Compiled patterns and the stop-word set, built once per engine.
#[derive(Debug)]
pub(crate) struct TextTools {
    stop_words: HashSet<&'static str>,
    word_re: Regex,
    sentence_split_re: Regex,
    pub(crate) heading_re: Regex,
    pub(crate) list_marker_re: Regex,
    pub(crate) emphasis_re: Regex,
    pub(crate) cta_re: Regex,
    pub(crate) pronoun_re: Regex,
}

impl TextTools {
    pub(crate) fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            word_re: Regex::new(r"[a-zA-Z]+").expect("valid word pattern"),
            sentence_split_re: Regex::new(r"[.!?]+").expect("valid sentence pattern"),
            heading_re: Regex::new(r"\n[A-Z][^.\n]*\n").expect("valid heading pattern"),
            list_marker_re: Regex::new(r"(?m)^\s*[-*\d+.]\s+").expect("valid list pattern"),
            emphasis_re: Regex::new(r"\*\*.*?\*\*|__.*?__|_.*?_|\*.*?\*")
                .expect("valid emphasis pattern"),
            cta_re: Regex::new(
                r"(?i)\b(share|comment|subscribe|follow|try|start|learn more|click here)\b",
            )
            .expect("valid cta pattern"),
            pronoun_re: Regex::new(r"(?i)\b(you|your|we|our|us|i|my)\b")
                .expect("valid pronoun pattern"),
        }
    }

    /// Lowercase alphabetic words with stop words removed. This is the
    /// word pool every frequency-based factor works from.
    pub(crate) fn extract_words(&self, text: &str) -> Vec<String> {
        self.word_re
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|w| !self.stop_words.contains(w.as_str()))
            .collect()
    }

    /// Pool words long enough to act as keywords.
    pub(crate) fn potential_keywords<'a>(&self, words: &'a [String]) -> Vec<&'a str> {
        words
            .iter()
            .filter(|w| w.len() > KEYWORD_MIN_LEN)
            .map(String::as_str)
            .collect()
    }

    /// Non-empty sentences, split on terminal punctuation runs.
    pub(crate) fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.sentence_split_re
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Sentence count of a text.
    pub(crate) fn count_sentences(&self, text: &str) -> usize {
        self.sentences(text).len()
    }

    /// Estimate syllables: vowel-group transitions, minus one for a
    /// trailing silent "e" when more than one group was found, floor 1.
    pub(crate) fn count_syllables(word: &str) -> usize {
        let word = word.to_lowercase();
        let mut count = 0_usize;
        let mut prev_was_vowel = false;

        for ch in word.chars() {
            let is_vowel = matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
            if is_vowel && !prev_was_vowel {
                count += 1;
            }
            prev_was_vowel = is_vowel;
        }

        if word.ends_with('e') && count > 1 {
            count -= 1;
        }

        count.max(1)
    }
}
