//! Writer identity and preferences.

use serde::{Deserialize, Serialize};

/// Reading level a writer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadingLevel {
    /// Plain language, short sentences.
    Beginner,
    /// General-audience prose.
    #[default]
    Intermediate,
    /// Dense, domain-heavy writing.
    Advanced,
}

impl ReadingLevel {
    /// String form used in logs and recommendations.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Writing style a writer prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WritingStyle {
    /// Conversational, contraction-friendly.
    Casual,
    /// Connective-heavy, contraction-averse.
    #[default]
    Formal,
    /// Implementation and methodology vocabulary.
    Technical,
    /// Imagery and narrative devices.
    Creative,
}

impl WritingStyle {
    /// String form used in logs and recommendations.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Formal => "formal",
            Self::Technical => "technical",
            Self::Creative => "creative",
        }
    }
}

/// User profile driving personalized scoring and recommendations.
///
/// Immutable once attached to a session; starting a new session is the only
/// way to change it. The typed enums reject out-of-range level/style values
/// at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable identifier for the writer.
    pub user_id: String,

    /// Topics the writer prefers to cover, in priority order.
    #[serde(default)]
    pub preferred_topics: Vec<String>,

    /// Target reading level.
    #[serde(default)]
    pub reading_level: ReadingLevel,

    /// Preferred writing style.
    #[serde(default)]
    pub writing_style: WritingStyle,

    /// Intended audience, free-form (e.g. "beginner", "professional").
    #[serde(default)]
    pub target_audience: Option<String>,

    /// Areas the writer has expertise in.
    #[serde(default)]
    pub expertise_areas: Vec<String>,

    /// Opaque host-defined goals; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_goals: Option<serde_json::Value>,
}

impl UserProfile {
    /// Create a profile with defaults for everything but the id.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            preferred_topics: Vec::new(),
            reading_level: ReadingLevel::default(),
            writing_style: WritingStyle::default(),
            target_audience: None,
            expertise_areas: Vec::new(),
            content_goals: None,
        }
    }

    /// Set preferred topics.
    #[must_use]
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.preferred_topics = topics;
        self
    }

    /// Set the reading level.
    #[must_use]
    pub fn with_reading_level(mut self, level: ReadingLevel) -> Self {
        self.reading_level = level;
        self
    }

    /// Set the writing style.
    #[must_use]
    pub fn with_writing_style(mut self, style: WritingStyle) -> Self {
        self.writing_style = style;
        self
    }

    /// Set the target audience.
    #[must_use]
    pub fn with_target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = Some(audience.into());
        self
    }

    /// Set expertise areas.
    #[must_use]
    pub fn with_expertise_areas(mut self, areas: Vec<String>) -> Self {
        self.expertise_areas = areas;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_builder() {
        let profile = UserProfile::new("user-1")
            .with_topics(vec!["rust".to_string()])
            .with_reading_level(ReadingLevel::Advanced)
            .with_writing_style(WritingStyle::Technical)
            .with_target_audience("technical");

        assert_eq!(profile.user_id, "user-1");
        assert_eq!(profile.reading_level, ReadingLevel::Advanced);
        assert_eq!(profile.writing_style, WritingStyle::Technical);
        assert_eq!(profile.target_audience.as_deref(), Some("technical"));
    }

    #[test]
    fn test_enum_serde_round_trip() {
        let json = serde_json::to_string(&WritingStyle::Creative).expect("serialize");
        assert_eq!(json, "\"creative\"");

        let level: ReadingLevel = serde_json::from_str("\"beginner\"").expect("deserialize");
        assert_eq!(level, ReadingLevel::Beginner);
    }

    #[test]
    fn test_out_of_range_level_rejected() {
        let result = serde_json::from_str::<ReadingLevel>("\"expert\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_defaults_from_minimal_json() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"user_id": "u-9"}"#).expect("deserialize");
        assert_eq!(profile.reading_level, ReadingLevel::Intermediate);
        assert_eq!(profile.writing_style, WritingStyle::Formal);
        assert!(profile.preferred_topics.is_empty());
    }
}
