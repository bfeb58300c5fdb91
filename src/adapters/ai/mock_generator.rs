//! Mock text generator for testing.
//!
//! Configurable implementation of the TextGenerator port so tests can run
//! without calling a real generation API.
//!
//! Responses are returned in configuration order; once the queue is down to
//! its last entry that entry repeats for every further call. The adaptive
//! provider issues one request per trait plus retries, so a single configured
//! batch serves a whole generation round.
//!
//! # Example
//!
//! ```ignore
//! let generator = MockGenerator::new()
//!     .with_response(r#"[{"text": "I plan ahead", "trait": "conscientiousness", "direction": 1}]"#);
//!
//! let response = generator.generate(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{
    GenerationRequest, GenerationResponse, GeneratorError, GeneratorInfo, TextGenerator,
};

/// A configured mock outcome.
#[derive(Debug, Clone)]
enum MockOutcome {
    Success(String),
    Error(GeneratorError),
}

/// Mock text generator for testing.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    /// Configured outcomes, consumed in order; the last one repeats.
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    /// Prompts seen, for verification.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Success(content.into()));
        self
    }

    /// Queues an `Unavailable` error with the given message.
    pub fn with_error(self, message: &str) -> Self {
        self.with_generator_error(GeneratorError::unavailable(message))
    }

    /// Queues an arbitrary generator error.
    pub fn with_generator_error(self, error: GeneratorError) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Error(error));
        self
    }

    /// Number of generate calls seen so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded requests.
    pub fn recorded_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn next_outcome(&self) -> MockOutcome {
        let mut outcomes = self.outcomes.lock().unwrap();
        match outcomes.len() {
            0 => MockOutcome::Error(GeneratorError::unavailable("no responses configured")),
            1 => outcomes[0].clone(),
            _ => outcomes.pop_front().expect("queue checked non-empty"),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GeneratorError> {
        self.calls.lock().unwrap().push(request);

        match self.next_outcome() {
            MockOutcome::Success(content) => Ok(GenerationResponse {
                content,
                model: "mock-model".to_string(),
            }),
            MockOutcome::Error(err) => Err(err),
        }
    }

    fn generator_info(&self) -> GeneratorInfo {
        GeneratorInfo::new("mock", "mock-model")
    }
}
