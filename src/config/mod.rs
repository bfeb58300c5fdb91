//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `PERSONA_ENGINE` prefix and nested values use `__` as separators.
//!
//! # Example
//!
//! ```no_run
//! use persona_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod assessment;
mod error;
mod generator;

pub use assessment::AssessmentConfig;
pub use error::{ConfigError, ValidationError};
pub use generator::GeneratorConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Assessment engine tuning (question counts, cooldown, overlay weights).
    #[serde(default)]
    pub assessment: AssessmentConfig,

    /// Text generator configuration (Anthropic API).
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Reads a `.env` file if present (development), then environment
    /// variables with the `PERSONA_ENGINE` prefix:
    /// `PERSONA_ENGINE__ASSESSMENT__COOLDOWN_SECS=60` ->
    /// `assessment.cooldown_secs = 60`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PERSONA_ENGINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.assessment.validate()?;
        self.generator.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assessment: AssessmentConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}
