//! Historical keyword-pattern store.
//!
//! An append-only, size-bounded log of past successful keyword patterns,
//! kept per user key. Retention is a plain FIFO: once a key holds
//! `max_per_key` entries the oldest is evicted on the next insert. This is
//! deliberately not a recency-based cache.
//!
//! Patterns are keyed by the writer's user id; flows with no profile fall
//! into a shared `"general"` bucket, matching the observed behavior of the
//! system this one replaces (see DESIGN.md).

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::domain::{Sentiment, UserProfile};

/// Bucket used when no profile (and hence no user id) is available.
pub const GENERAL_KEY: &str = "general";

/// A successful keyword pattern learned from a past analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPattern {
    /// When the source analysis ran.
    pub timestamp: DateTime<Utc>,

    /// Character length of the analyzed content.
    pub content_length: usize,

    /// Keywords that scored above the relevance threshold.
    pub successful_keywords: Vec<String>,

    /// Readability of the analyzed content.
    pub readability_score: f64,

    /// Topics of the analyzed content.
    pub topics: Vec<String>,

    /// Dominant sentiment of the analyzed content.
    pub sentiment: Sentiment,
}

/// Append-only, size-bounded per-key log of historical patterns.
///
/// # Thread Safety
///
/// A single mutex serializes append/evict; reads return cloned snapshots,
/// so callers never hold the lock while working with results.
#[derive(Debug)]
pub struct HistoricalPatternStore {
    max_per_key: usize,
    inner: Mutex<HashMap<String, VecDeque<HistoricalPattern>>>,
}

impl HistoricalPatternStore {
    /// Create a store retaining at most `max_per_key` patterns per key.
    #[must_use]
    pub fn new(max_per_key: usize) -> Self {
        Self {
            max_per_key: max_per_key.max(1),
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the store key for an optional profile.
    #[must_use]
    pub fn key_for(profile: Option<&UserProfile>) -> String {
        match profile {
            Some(p) if !p.user_id.trim().is_empty() => p.user_id.clone(),
            _ => GENERAL_KEY.to_string(),
        }
    }

    /// Append a pattern under a key, evicting the oldest entry when full.
    pub fn record(&self, key: &str, pattern: HistoricalPattern) {
        let mut inner = self.inner.lock();
        let log = inner.entry(key.to_string()).or_default();

        log.push_back(pattern);
        while log.len() > self.max_per_key {
            log.pop_front();
        }

        tracing::debug!(key, stored = log.len(), "recorded historical pattern");
    }

    /// Snapshot of the patterns stored under a key, oldest first.
    #[must_use]
    pub fn patterns_for(&self, key: &str) -> Vec<HistoricalPattern> {
        self.inner
            .lock()
            .get(key)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Union of successful keywords across a key's patterns, lowercased.
    #[must_use]
    pub fn successful_keywords(&self, key: &str) -> HashSet<String> {
        self.inner
            .lock()
            .get(key)
            .map(|log| {
                log.iter()
                    .flat_map(|p| p.successful_keywords.iter())
                    .map(|k| k.to_lowercase())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of patterns stored under a key.
    #[must_use]
    pub fn len_for(&self, key: &str) -> usize {
        self.inner.lock().get(key).map_or(0, VecDeque::len)
    }

    /// Total patterns stored across all keys.
    #[must_use]
    pub fn total_patterns(&self) -> usize {
        self.inner.lock().values().map(VecDeque::len).sum()
    }
}

impl Default for HistoricalPatternStore {
    fn default() -> Self {
        Self::new(crate::config::HistoryConfig::default().max_patterns_per_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(content_length: usize, keywords: &[&str]) -> HistoricalPattern {
        HistoricalPattern {
            timestamp: Utc::now(),
            content_length,
            successful_keywords: keywords.iter().map(ToString::to_string).collect(),
            readability_score: 70.0,
            topics: vec!["testing".to_string()],
            sentiment: Sentiment::Neutral,
        }
    }

    #[test]
    fn test_record_and_read_back() {
        let store = HistoricalPatternStore::new(100);
        store.record("user-1", pattern(500, &["rust", "async"]));

        let patterns = store.patterns_for("user-1");
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].content_length, 500);
        assert!(store.patterns_for("user-2").is_empty());
    }

    #[test]
    fn test_bounded_fifo_eviction() {
        let store = HistoricalPatternStore::new(100);

        for i in 0..150 {
            store.record("user-1", pattern(i, &["kw"]));
        }

        assert_eq!(store.len_for("user-1"), 100);
        let patterns = store.patterns_for("user-1");
        // Oldest entries were evicted first.
        assert_eq!(patterns[0].content_length, 50);
        assert_eq!(patterns[99].content_length, 149);
    }

    #[test]
    fn test_bound_holds_per_key() {
        let store = HistoricalPatternStore::new(10);

        for i in 0..25 {
            store.record("a", pattern(i, &[]));
            store.record("b", pattern(i, &[]));
        }

        assert_eq!(store.len_for("a"), 10);
        assert_eq!(store.len_for("b"), 10);
        assert_eq!(store.total_patterns(), 20);
    }

    #[test]
    fn test_successful_keywords_lowercased_union() {
        let store = HistoricalPatternStore::new(100);
        store.record("user-1", pattern(100, &["Rust", "tokio"]));
        store.record("user-1", pattern(200, &["rust", "serde"]));

        let keywords = store.successful_keywords("user-1");
        assert_eq!(keywords.len(), 3);
        assert!(keywords.contains("rust"));
        assert!(keywords.contains("tokio"));
        assert!(keywords.contains("serde"));
    }

    #[test]
    fn test_key_for_profile() {
        let profile = UserProfile::new("writer-9");
        assert_eq!(
            HistoricalPatternStore::key_for(Some(&profile)),
            "writer-9"
        );
        assert_eq!(HistoricalPatternStore::key_for(None), GENERAL_KEY);

        let blank = UserProfile::new("   ");
        assert_eq!(HistoricalPatternStore::key_for(Some(&blank)), GENERAL_KEY);
    }
}
