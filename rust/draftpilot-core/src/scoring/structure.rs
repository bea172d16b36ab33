//! Content-structure factor: paragraphs, sentence variety, headings.

use super::text::TextTools;

/// Structure score in [0, 100]: equal-weighted mean of the collected
/// sub-signals (paragraph count, sentence length and variety when any
/// sentences exist, heading indicators).
pub(crate) fn score(tools: &TextTools, content: &str) -> f64 {
    let mut scores: Vec<f64> = Vec::new();

    let paragraph_count = content
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count();

    // Ideal: 3-8 paragraphs for most content.
    let para_score = if (3..=8).contains(&paragraph_count) {
        100.0
    } else if paragraph_count < 3 {
        (paragraph_count as f64 * 33.3).max(0.0)
    } else {
        (100.0 - (paragraph_count as f64 - 8.0) * 10.0).max(0.0)
    };
    scores.push(para_score);

    let sentences = tools.sentences(content);
    if !sentences.is_empty() {
        let lengths: Vec<usize> = sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .collect();
        let avg = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;

        // Good average: 15-25 words per sentence.
        let length_score = (100.0 * (1.0 - (avg - 20.0).abs() / 20.0)).clamp(0.0, 100.0);

        let distinct = lengths
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len();
        let variety_score = distinct as f64 / lengths.len() as f64 * 100.0;

        scores.push(length_score);
        scores.push(variety_score);
    }

    // Capitalized single-line headings; four of them reach 100.
    let heading_count = tools.heading_re.find_iter(content).count();
    scores.push(((heading_count * 25) as f64).min(100.0));

    let average = scores.iter().sum::<f64>() / scores.len() as f64;
    average.clamp(0.0, 100.0)
}
