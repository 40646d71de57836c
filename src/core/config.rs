//! Engine configuration with documented constants
//!
//! Every tunable number used by personalization and session flow lives here.
//! Values can be overridden from a TOML file; missing keys keep their defaults.

use crate::core::error::{MentorError, Result};
use crate::handoff::HandoffSourceKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentorConfig {
    pub scoring: ScoringConfig,
    pub session: SessionConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub handoff: HandoffConfig,
}

/// Profile scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Added to a context preference each time a word tagged with it is selected
    ///
    /// Scores are unbounded and only their ranking matters, so the absolute
    /// value is irrelevant as long as it is positive.
    pub selection_weight: f64,

    /// Amount the estimated level rises after a well-completed session
    ///
    /// At 0.25, four strong sessions move a learner one full level, which
    /// crosses at most one task-archetype boundary at a time.
    pub level_step: f64,

    /// Completion ratio at or above which a session counts as "high completion"
    pub high_completion_ratio: f64,

    /// Confidence gained per completed session (capped at 1.0)
    pub confidence_step: f64,

    /// Estimated level for a fresh profile
    pub default_level: f64,

    /// Lower clamp for the estimated level
    pub min_level: f64,

    /// Upper clamp for the estimated level
    pub max_level: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            selection_weight: 1.0,
            level_step: 0.25,
            high_completion_ratio: 0.8,
            confidence_step: 0.05,
            default_level: 5.0,
            min_level: 1.0,
            max_level: 10.0,
        }
    }
}

/// Session flow constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Extra generation attempts when an attempt yields zero interactions
    pub generation_retries: u32,

    /// Maximum number of behavior events kept per user
    ///
    /// Older events are dropped first. The profile already folds every
    /// event in, so the log is only diagnostic history.
    pub max_logged_events: usize,

    /// Number of words suggested by the recommender
    pub recommendation_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            generation_retries: 2,
            max_logged_events: 200,
            recommendation_count: 5,
        }
    }
}

/// LLM endpoint settings. The API key is always read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".into(),
            model: "claude-3-haiku-20240307".into(),
            max_tokens: 512,
            temperature: 0.7,
            api_key_env: "LLM_API_KEY".into(),
        }
    }
}

/// Where the persistent store keeps its files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".word-mentor"),
        }
    }
}

/// Carriers for the selected-words handoff, tried in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    pub sources: Vec<HandoffSourceKind>,
    /// Query parameter that carries the JSON word list in a session URL
    pub url_parameter: String,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                HandoffSourceKind::SessionStorage,
                HandoffSourceKind::UrlParameter,
                HandoffSourceKind::PersistentStorage,
            ],
            url_parameter: "words".into(),
        }
    }
}

impl MentorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MentorConfig =
            toml::from_str(content).map_err(|e| MentorError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MentorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;

        if s.selection_weight <= 0.0 {
            return Err(MentorError::Config("selection_weight must be positive".into()));
        }

        if s.level_step < 0.0 || s.confidence_step < 0.0 {
            return Err(MentorError::Config("level and confidence steps must not be negative".into()));
        }

        if !(0.0..=1.0).contains(&s.high_completion_ratio) {
            return Err(MentorError::Config(format!(
                "high_completion_ratio ({}) must be within [0, 1]",
                s.high_completion_ratio
            )));
        }

        if s.min_level >= s.max_level {
            return Err(MentorError::Config(format!(
                "min_level ({}) should be < max_level ({})",
                s.min_level, s.max_level
            )));
        }

        if !(s.min_level..=s.max_level).contains(&s.default_level) {
            return Err(MentorError::Config(format!(
                "default_level ({}) must lie within [{}, {}]",
                s.default_level, s.min_level, s.max_level
            )));
        }

        if self.handoff.sources.is_empty() {
            return Err(MentorError::Config("handoff.sources must name at least one carrier".into()));
        }

        Ok(())
    }
}
