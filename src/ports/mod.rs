//! Ports - interfaces to external collaborators.
//!
//! Adapters implement these traits; the application layer depends only on
//! the traits, never on concrete integrations.

mod assessment_store;
mod behavior_summarizer;
mod text_generator;

pub use assessment_store::{AssessmentStore, StoreError};
pub use behavior_summarizer::BehaviorSummarizer;
pub use text_generator::{
    GenerationRequest, GenerationResponse, GeneratorError, GeneratorInfo, TextGenerator,
};
