//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Total question count must be at least 1")]
    InvalidQuestionCount,

    #[error("Generation retry bound must be at least 1")]
    InvalidRetryBound,

    #[error("Invalid timeout")]
    InvalidTimeout,

    #[error("Generator base URL must use http or https")]
    InvalidBaseUrl,
}
