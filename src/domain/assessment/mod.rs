//! Assessment module - the session engine's domain core.
//!
//! Contains the five-trait model, question and response value objects, the
//! static question bank, the pure scoring engine, the behavioral adjustment
//! vector, and the `AssessmentSession` aggregate.

mod adjustment;
mod bank;
mod errors;
mod question;
mod response;
mod scoring;
mod session;
mod trait_kind;

pub use adjustment::{AdjustmentVector, AdjustmentWeights, BehaviorSnapshot, ADJUSTMENT_BOUND};
pub use bank::{sample_balanced, trait_quotas, QuestionBank, BANK_VERSION};
pub use errors::AssessmentError;
pub use question::{Direction, Question, QuestionSet, QuestionSource};
pub use response::Response;
pub use scoring::{score_responses, TraitScores};
pub use session::{AssessmentSession, SessionState};
pub use trait_kind::TraitKind;
