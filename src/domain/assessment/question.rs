//! Question and question-set value objects.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::TraitKind;

/// Scoring direction of a statement.
///
/// `Negative` statements are reverse-scored: strong agreement counts
/// against the trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Creates a Direction from the +1/-1 convention used by the generator.
    pub fn try_from_i32(value: i32) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(Direction::Positive),
            -1 => Ok(Direction::Negative),
            _ => Err(ValidationError::out_of_range("direction", -1, 1, value)),
        }
    }

    /// Returns the numeric sign (+1 or -1).
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    /// Normalizes a raw 1-5 agreement value for scoring.
    ///
    /// Positive items pass through; negative items reverse (6 - raw).
    pub fn normalize(&self, raw_value: i32) -> i32 {
        match self {
            Direction::Positive => raw_value,
            Direction::Negative => 6 - raw_value,
        }
    }
}

/// Where a question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    /// Produced by the adaptive generator for this session.
    Generated,
    /// Sampled from the static question bank.
    Bank,
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionSource::Generated => write!(f, "generated"),
            QuestionSource::Bank => write!(f, "bank"),
        }
    }
}

/// A single assessment statement. Immutable once issued to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub trait_kind: TraitKind,
    pub direction: Direction,
    pub source: QuestionSource,
}

impl Question {
    /// Creates a question, rejecting empty statement text.
    pub fn new(
        text: impl Into<String>,
        trait_kind: TraitKind,
        direction: Direction,
        source: QuestionSource,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(Self {
            text,
            trait_kind,
            direction,
            source,
        })
    }
}

/// Ordered, fixed-length sequence of questions assembled at session start.
///
/// Length and per-trait composition never change for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    /// Wraps an ordered list of questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self(questions)
    }

    /// Number of questions in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the question at a position, if in range.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.0.get(index)
    }

    /// Returns the underlying slice.
    pub fn as_slice(&self) -> &[Question] {
        &self.0
    }

    /// Counts questions per trait.
    pub fn trait_counts(&self) -> HashMap<TraitKind, usize> {
        let mut counts = HashMap::new();
        for q in &self.0 {
            *counts.entry(q.trait_kind).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the source of the set, or `None` for a mixed or empty set.
    ///
    /// Sets are never mixed in practice; a request is satisfied entirely by
    /// the generator or entirely by the bank.
    pub fn uniform_source(&self) -> Option<QuestionSource> {
        let first = self.0.first()?.source;
        self.0.iter().all(|q| q.source == first).then_some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(trait_kind: TraitKind, direction: Direction) -> Question {
        Question::new("I enjoy trying new things.", trait_kind, direction, QuestionSource::Bank)
            .unwrap()
    }

    #[test]
    fn direction_from_sign_convention() {
        assert_eq!(Direction::try_from_i32(1).unwrap(), Direction::Positive);
        assert_eq!(Direction::try_from_i32(-1).unwrap(), Direction::Negative);
        assert!(Direction::try_from_i32(0).is_err());
        assert!(Direction::try_from_i32(2).is_err());
    }

    #[test]
    fn positive_direction_passes_value_through() {
        for v in 1..=5 {
            assert_eq!(Direction::Positive.normalize(v), v);
        }
    }

    #[test]
    fn negative_direction_reverses_value() {
        assert_eq!(Direction::Negative.normalize(5), 1);
        assert_eq!(Direction::Negative.normalize(1), 5);
        assert_eq!(Direction::Negative.normalize(3), 3);
    }

    #[test]
    fn question_rejects_blank_text() {
        let result = Question::new(
            "   ",
            TraitKind::Openness,
            Direction::Positive,
            QuestionSource::Bank,
        );
        assert!(result.is_err());
    }

    #[test]
    fn trait_counts_tallies_composition() {
        let set = QuestionSet::new(vec![
            question(TraitKind::Openness, Direction::Positive),
            question(TraitKind::Openness, Direction::Negative),
            question(TraitKind::Neuroticism, Direction::Positive),
        ]);
        let counts = set.trait_counts();
        assert_eq!(counts.get(&TraitKind::Openness), Some(&2));
        assert_eq!(counts.get(&TraitKind::Neuroticism), Some(&1));
        assert_eq!(counts.get(&TraitKind::Extraversion), None);
    }

    #[test]
    fn uniform_source_detects_single_origin() {
        let set = QuestionSet::new(vec![
            question(TraitKind::Openness, Direction::Positive),
            question(TraitKind::Extraversion, Direction::Positive),
        ]);
        assert_eq!(set.uniform_source(), Some(QuestionSource::Bank));
        assert_eq!(QuestionSet::new(vec![]).uniform_source(), None);
    }

    #[test]
    fn source_displays_lowercase_tag() {
        assert_eq!(QuestionSource::Generated.to_string(), "generated");
        assert_eq!(QuestionSource::Bank.to_string(), "bank");
    }
}
