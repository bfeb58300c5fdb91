//! Assessment lifecycle handlers.

mod answer_question;
mod get_profile;
mod get_status;
mod start_assessment;

pub use answer_question::{AnswerOutcome, AnswerQuestionCommand, AnswerQuestionHandler};
pub use get_profile::{CompletedProfile, GetProfileHandler};
pub use get_status::{AssessmentStatus, GetStatusHandler};
pub use start_assessment::{StartAssessmentCommand, StartAssessmentHandler, StartAssessmentResult};

use serde::Serialize;

use crate::domain::assessment::{Question, QuestionSource, TraitKind};
use crate::domain::foundation::LIKERT_OPTIONS;

/// A question as presented to the respondent.
///
/// Carries the fixed Likert option list and the source tag for
/// observability.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedQuestion {
    pub text: String,
    pub trait_kind: TraitKind,
    pub options: [&'static str; 5],
    pub source: QuestionSource,
}

impl IssuedQuestion {
    fn from_question(question: &Question) -> Self {
        Self {
            text: question.text.clone(),
            trait_kind: question.trait_kind,
            options: LIKERT_OPTIONS,
            source: question.source,
        }
    }
}
