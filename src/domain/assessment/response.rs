//! Response record for a single answered question.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LikertValue, Timestamp};

use super::{Direction, Question, TraitKind};

/// One answered question. Append-only; one per question-set position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Position in the session's question set.
    pub question_index: usize,
    pub trait_kind: TraitKind,
    pub direction: Direction,
    pub value: LikertValue,
    pub recorded_at: Timestamp,
}

impl Response {
    /// Builds a response from the question at the given position.
    pub fn record(question: &Question, question_index: usize, value: LikertValue) -> Self {
        Self {
            question_index,
            trait_kind: question.trait_kind,
            direction: question.direction,
            value,
            recorded_at: Timestamp::now(),
        }
    }

    /// Returns the normalized 1-5 value after direction correction.
    pub fn normalized(&self) -> i32 {
        self.direction.normalize(self.value.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::QuestionSource;

    #[test]
    fn record_copies_trait_and_direction_from_question() {
        let q = Question::new(
            "I often feel tense.",
            TraitKind::Neuroticism,
            Direction::Positive,
            QuestionSource::Bank,
        )
        .unwrap();
        let r = Response::record(&q, 7, LikertValue::try_from_i32(4).unwrap());
        assert_eq!(r.question_index, 7);
        assert_eq!(r.trait_kind, TraitKind::Neuroticism);
        assert_eq!(r.direction, Direction::Positive);
        assert_eq!(r.normalized(), 4);
    }

    #[test]
    fn normalized_reverses_negative_items() {
        let q = Question::new(
            "I rarely worry.",
            TraitKind::Neuroticism,
            Direction::Negative,
            QuestionSource::Bank,
        )
        .unwrap();
        let r = Response::record(&q, 0, LikertValue::try_from_i32(5).unwrap());
        assert_eq!(r.normalized(), 1);
    }
}
