//! SEO factor: length, keyword density, meta-content, structural markers.

use super::text::TextTools;

/// Optimal word-count band for search-ranked content.
const IDEAL_MIN_WORDS: f64 = 800.0;
const IDEAL_MAX_WORDS: f64 = 2_000.0;

/// SEO score in [0, 100]: equal-weighted mean of four signals.
pub(crate) fn score(tools: &TextTools, content: &str) -> f64 {
    let words = tools.extract_words(content);
    let word_count = words.len();
    let wc = word_count as f64;

    // Content length.
    let length_score = if (IDEAL_MIN_WORDS..=IDEAL_MAX_WORDS).contains(&wc) {
        100.0
    } else if wc < IDEAL_MIN_WORDS {
        wc / IDEAL_MIN_WORDS * 100.0
    } else {
        (100.0 - (wc - IDEAL_MAX_WORDS) / 100.0).max(0.0)
    };

    // Keyword density, ideal 1-3%.
    let keyword_count = tools.potential_keywords(&words).len();
    let density = keyword_count as f64 / wc.max(1.0) * 100.0;
    let density_score = if (1.0..=3.0).contains(&density) {
        100.0
    } else {
        (100.0 - (density - 2.0).abs() * 25.0).max(0.0)
    };

    // Meta-content indicators: a title-like first line, a substantial
    // opening paragraph, and a wrap-up section.
    let first_line_len = content.lines().next().map_or(0, |l| l.chars().count());
    let has_title_like = (10..=60).contains(&first_line_len);
    let has_intro = content
        .split_once("\n\n")
        .is_some_and(|(first, _)| first.chars().count() > 100);
    let content_lower = content.to_lowercase();
    let has_conclusion =
        content_lower.contains("conclusion") || content_lower.contains("summary");

    let meta_score =
        [has_title_like, has_intro, has_conclusion]
            .iter()
            .filter(|b| **b)
            .count() as f64
            * 33.3;

    // Internal structure markers.
    let has_lists = tools.list_marker_re.is_match(content);
    let has_emphasis = tools.emphasis_re.is_match(content);
    let structure_score = [has_lists, has_emphasis].iter().filter(|b| **b).count() as f64 * 50.0;

    let average = (length_score + density_score + meta_score + structure_score) / 4.0;
    average.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> TextTools {
        TextTools::new()
    }

    #[test]
    fn test_score_in_range() {
        let value = score(&tools(), "A short note.");
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_meta_indicators_rewarded() {
        let optimized = "A Guide To Better Garden Soil\n\n\
            This opening paragraph runs long enough to count as a real introduction, \
            laying out what the reader can expect from the rest of the article in detail.\n\n\
            - composting basics\n- watering schedules\n\n\
            **Remember** the essentials.\n\nIn summary, start small.";
        let bare = "soil";

        assert!(score(&tools(), optimized) > score(&tools(), bare));
    }

    #[test]
    fn test_list_and_emphasis_detection() {
        assert!(tools().list_marker_re.is_match("- item one\n- item two"));
        assert!(tools().list_marker_re.is_match("1. first\n2. second"));
        assert!(tools().emphasis_re.is_match("this is **bold** text"));
        assert!(tools().emphasis_re.is_match("this is _italic_ text"));
        assert!(!tools().emphasis_re.is_match("no markup here"));
    }

    #[test]
    fn test_long_content_penalized_past_band() {
        let ideal = "distinctive vocabulary keeps appearing throughout sections ".repeat(120);
        let bloated = "distinctive vocabulary keeps appearing throughout sections ".repeat(700);

        assert!(score(&tools(), &ideal) >= score(&tools(), &bloated));
    }
}
