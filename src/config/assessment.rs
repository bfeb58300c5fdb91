//! Assessment engine configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::assessment::AdjustmentWeights;

use super::error::ValidationError;

/// Assessment engine tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentConfig {
    /// Total questions per session, split evenly across the five traits.
    #[serde(default = "default_total_questions")]
    pub total_questions: usize,

    /// Minimum seconds between completing an assessment and starting a new
    /// one. Production guidance is 14 days; tests use short windows.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Generation attempts per trait before the adaptive provider gives up.
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,

    /// Overall budget for all trait-generation calls; expiry falls back to
    /// the question bank.
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    /// Lookback window for the behavioral snapshot.
    #[serde(default = "default_behavior_window_days")]
    pub behavior_window_days: u32,

    /// Overlay nudge thresholds and sizes.
    #[serde(default)]
    pub adjustment_weights: AdjustmentWeights,
}

impl AssessmentConfig {
    /// Generation timeout as a Duration.
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validates assessment configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total_questions == 0 {
            return Err(ValidationError::InvalidQuestionCount);
        }
        if self.max_generation_attempts == 0 {
            return Err(ValidationError::InvalidRetryBound);
        }
        if self.generation_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            total_questions: default_total_questions(),
            cooldown_secs: default_cooldown_secs(),
            max_generation_attempts: default_max_generation_attempts(),
            generation_timeout_secs: default_generation_timeout_secs(),
            behavior_window_days: default_behavior_window_days(),
            adjustment_weights: AdjustmentWeights::default(),
        }
    }
}

fn default_total_questions() -> usize {
    30
}

fn default_cooldown_secs() -> u64 {
    14 * 86_400
}

fn default_max_generation_attempts() -> u32 {
    4
}

fn default_generation_timeout_secs() -> u64 {
    60
}

fn default_behavior_window_days() -> u32 {
    7
}
