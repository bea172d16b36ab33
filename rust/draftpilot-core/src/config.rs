//! Configuration types for the assistance engine.
//!
//! All knobs are plain serde-deserializable structs with per-field defaults,
//! so a host can overlay partial configuration from whatever source it uses.
//! Loading from files or the environment is the host's concern.

use serde::Deserialize;

/// Retry behavior for external analyzer calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds before the first retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on any single delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Base of the exponential backoff curve.
    #[serde(default = "default_exponential_base")]
    pub exponential_base: f64,

    /// Whether to multiply each delay by a uniform factor in [0.5, 1.0).
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_exponential_base() -> f64 {
    2.0
}

fn default_jitter() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            exponential_base: default_exponential_base(),
            jitter: default_jitter(),
        }
    }
}

/// Circuit breaker thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// Cooldown in seconds before an open circuit admits a probe.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Successful probes required to close the circuit from half-open.
    #[serde(default = "default_success_threshold")]
    pub success_threshold: u32,
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_success_threshold() -> u32 {
    1
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            cooldown_secs: default_cooldown_secs(),
            success_threshold: default_success_threshold(),
        }
    }
}

/// Workflow loop and refinement knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Hard cap on analysis passes per draft update.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Fractional draft-length change that counts as significant.
    #[serde(default = "default_significant_change_ratio")]
    pub significant_change_ratio: f64,

    /// Keywords surviving the refinement stage.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Characters of context captured on each side of the cursor.
    #[serde(default = "default_cursor_context_chars")]
    pub cursor_context_chars: usize,

    /// Sentence fragments shorter than this are flagged as weak.
    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,
}

fn default_max_iterations() -> u32 {
    2
}

fn default_significant_change_ratio() -> f64 {
    0.2
}

fn default_max_keywords() -> usize {
    10
}

fn default_cursor_context_chars() -> usize {
    100
}

fn default_min_sentence_chars() -> usize {
    10
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            significant_change_ratio: default_significant_change_ratio(),
            max_keywords: default_max_keywords(),
            cursor_context_chars: default_cursor_context_chars(),
            min_sentence_chars: default_min_sentence_chars(),
        }
    }
}

/// Historical pattern store sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Most recent patterns retained per key; older entries are evicted first.
    #[serde(default = "default_max_patterns_per_key")]
    pub max_patterns_per_key: usize,

    /// Relevance above which a keyword counts as successful.
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f64,
}

fn default_max_patterns_per_key() -> usize {
    100
}

fn default_relevance_threshold() -> f64 {
    0.7
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_patterns_per_key: default_max_patterns_per_key(),
            relevance_threshold: default_relevance_threshold(),
        }
    }
}

/// Aggregate configuration for the orchestrator and its collaborators.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistConfig {
    /// Retry behavior for analyzer calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Circuit breaker thresholds.
    #[serde(default)]
    pub breaker: CircuitBreakerConfig,

    /// Workflow loop knobs.
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Historical pattern store sizing.
    #[serde(default)]
    pub history: HistoryConfig,
}
