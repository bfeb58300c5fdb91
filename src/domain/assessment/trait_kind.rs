//! The five-factor trait model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five fixed personality dimensions. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl TraitKind {
    /// All traits in canonical order. Quota remainders go to the earliest.
    pub const ALL: [TraitKind; 5] = [
        TraitKind::Openness,
        TraitKind::Conscientiousness,
        TraitKind::Extraversion,
        TraitKind::Agreeableness,
        TraitKind::Neuroticism,
    ];

    /// Number of traits in the model.
    pub const COUNT: usize = 5;

    /// Returns the canonical index of this trait (position in [`Self::ALL`]).
    pub fn index(&self) -> usize {
        match self {
            TraitKind::Openness => 0,
            TraitKind::Conscientiousness => 1,
            TraitKind::Extraversion => 2,
            TraitKind::Agreeableness => 3,
            TraitKind::Neuroticism => 4,
        }
    }

    /// Returns the human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TraitKind::Openness => "Openness",
            TraitKind::Conscientiousness => "Conscientiousness",
            TraitKind::Extraversion => "Extraversion",
            TraitKind::Agreeableness => "Agreeableness",
            TraitKind::Neuroticism => "Neuroticism",
        }
    }

    /// Parses a trait label case-insensitively.
    ///
    /// Returns `None` for anything outside the closed set; the generator's
    /// output is untrusted so this never panics.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openness" => Some(TraitKind::Openness),
            "conscientiousness" => Some(TraitKind::Conscientiousness),
            "extraversion" => Some(TraitKind::Extraversion),
            "agreeableness" => Some(TraitKind::Agreeableness),
            "neuroticism" => Some(TraitKind::Neuroticism),
            _ => None,
        }
    }

    /// Returns a banded description of a 0-100 score on this trait.
    ///
    /// Bands: low (< 35), moderate (35-64), high (>= 65).
    pub fn describe(&self, score: i32) -> &'static str {
        let band = if score < 35 {
            0
        } else if score < 65 {
            1
        } else {
            2
        };
        match (self, band) {
            (TraitKind::Openness, 0) => {
                "Prefers the familiar and concrete; values routine over novelty."
            }
            (TraitKind::Openness, 1) => {
                "Balances curiosity with practicality; open to new ideas when they earn it."
            }
            (TraitKind::Openness, _) => {
                "Curious and imaginative; drawn to new ideas, art, and unconventional approaches."
            }
            (TraitKind::Conscientiousness, 0) => {
                "Flexible and spontaneous; plans loosely and adapts as things unfold."
            }
            (TraitKind::Conscientiousness, 1) => {
                "Generally organized and reliable, with room for spontaneity."
            }
            (TraitKind::Conscientiousness, _) => {
                "Disciplined and thorough; sets goals, plans ahead, and follows through."
            }
            (TraitKind::Extraversion, 0) => {
                "Reserved and reflective; recharges in quiet, smaller settings."
            }
            (TraitKind::Extraversion, 1) => {
                "Comfortable in company and in solitude; engages socially on own terms."
            }
            (TraitKind::Extraversion, _) => {
                "Outgoing and energetic; draws energy from people and activity."
            }
            (TraitKind::Agreeableness, 0) => {
                "Direct and competitive; prioritizes candor over harmony."
            }
            (TraitKind::Agreeableness, 1) => {
                "Cooperative but willing to push back; balances empathy with self-interest."
            }
            (TraitKind::Agreeableness, _) => {
                "Warm and trusting; values cooperation and goes out of the way to help."
            }
            (TraitKind::Neuroticism, 0) => {
                "Emotionally steady; rarely rattled by stress or setbacks."
            }
            (TraitKind::Neuroticism, 1) => {
                "Generally calm, with occasional stress responses in demanding periods."
            }
            (TraitKind::Neuroticism, _) => {
                "Emotionally responsive; feels stress and worry keenly and benefits from recovery time."
            }
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
