//! Likert scoring engine.
//!
//! Pure functions from a response log to per-trait 0-100 scores. No hidden
//! state: the same log always yields the same scores, so callers can safely
//! re-invoke it to repair sessions whose stored scores drifted from their
//! response log.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{AdjustmentVector, Response, TraitKind};

/// Neutral score used only when scoring an empty response log.
const NEUTRAL_SCORE: i32 = 50;

/// Per-trait integer scores on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitScores(HashMap<TraitKind, i32>);

impl TraitScores {
    /// Builds scores from a complete per-trait map.
    pub fn new(scores: HashMap<TraitKind, i32>) -> Self {
        Self(scores)
    }

    /// Returns the score for a trait.
    pub fn get(&self, trait_kind: TraitKind) -> i32 {
        self.0.get(&trait_kind).copied().unwrap_or(NEUTRAL_SCORE)
    }

    /// Returns all scores keyed by trait.
    pub fn as_map(&self) -> &HashMap<TraitKind, i32> {
        &self.0
    }

    /// Applies an adjustment vector additively, clamping each trait to 0-100.
    ///
    /// Base scores are never mutated; adjustments are applied at read time.
    pub fn with_adjustments(&self, adjustments: &AdjustmentVector) -> TraitScores {
        let adjusted = TraitKind::ALL
            .iter()
            .map(|&t| {
                let raw = self.get(t) as f64 + adjustments.get(t);
                (t, (raw.round() as i32).clamp(0, 100))
            })
            .collect();
        TraitScores(adjusted)
    }
}

/// Scores a response log.
///
/// Each response is direction-normalized to 1-5, averaged per trait, and
/// rescaled to 0-100 via `(avg - 1) / 4 * 100`, truncated to an integer.
///
/// A trait with zero responses (malformed or partial data; normal flows
/// guarantee full coverage) falls back to the average normalized value
/// across all observed responses, keeping the fallback consistent with the
/// respondent's overall tendency rather than a fixed constant. An empty log
/// scores every trait at the neutral midpoint.
pub fn score_responses(responses: &[Response]) -> TraitScores {
    let mut sums: HashMap<TraitKind, (i64, u32)> = HashMap::new();
    let mut overall_sum: i64 = 0;

    for response in responses {
        let normalized = response.normalized() as i64;
        let entry = sums.entry(response.trait_kind).or_insert((0, 0));
        entry.0 += normalized;
        entry.1 += 1;
        overall_sum += normalized;
    }

    let overall_avg = if responses.is_empty() {
        None
    } else {
        Some(overall_sum as f64 / responses.len() as f64)
    };

    let scores = TraitKind::ALL
        .iter()
        .map(|&t| {
            let score = match (sums.get(&t), overall_avg) {
                (Some(&(sum, count)), _) => rescale(sum as f64 / count as f64),
                (None, Some(avg)) => rescale(avg),
                (None, None) => NEUTRAL_SCORE,
            };
            (t, score)
        })
        .collect();

    TraitScores::new(scores)
}

/// Rescales a 1-5 average to a truncated 0-100 integer.
fn rescale(avg: f64) -> i32 {
    ((avg - 1.0) / 4.0 * 100.0) as i32
}
