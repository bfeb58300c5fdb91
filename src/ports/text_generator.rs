//! Text generator port - interface to the external generation capability.
//!
//! Abstracts the AI text-generation service the adaptive question provider
//! negotiates with. The service is treated as untrusted and possibly slow or
//! unavailable: responses are plain text that callers must parse
//! defensively, and every error is classified for retry decisions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for external text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a single completion for a prompt.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GeneratorError>;

    /// Returns generator information (name, model).
    fn generator_info(&self) -> GeneratorInfo;
}

/// Request for a text generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Prompt text sent to the generator.
    pub prompt: String,
    /// System instructions to steer output shape.
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Creates a new request for a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Response from the generator.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Raw generated text, unparsed and untrusted.
    pub content: String,
    /// Model that produced the response.
    pub model: String,
}

/// Generator information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorInfo {
    /// Provider name (e.g., "anthropic", "mock").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl GeneratorInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Generator errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeneratorError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("generator unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Provider returned a response we could not read.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl GeneratorError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeneratorError::RateLimited { .. }
                | GeneratorError::Unavailable { .. }
                | GeneratorError::Network(_)
                | GeneratorError::Timeout { .. }
        )
    }
}
