//! In-memory adapters.
//!
//! Thread-safe, non-persistent implementations of the persistence and
//! behavior ports. Suitable for tests, demos, and single-process
//! deployments; data does not survive a restart.

mod assessment_store;
mod behavior_summarizer;

pub use assessment_store::InMemoryAssessmentStore;
pub use behavior_summarizer::FixedBehaviorSummarizer;
