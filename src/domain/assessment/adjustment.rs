//! Behavioral adjustment overlay types.
//!
//! Completed scores are nudged by small, bounded deltas derived from recent
//! activity signals. Adjustments accumulate across periodic recalculations
//! and saturate at the bound; base scores are never rewritten.

use serde::{Deserialize, Serialize};

use super::TraitKind;

/// Saturation bound for each accumulated adjustment component.
pub const ADJUSTMENT_BOUND: f64 = 5.0;

/// Aggregated, anonymized recent-activity signals.
///
/// Carries no raw records; only summary statistics over the lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSnapshot {
    /// Fraction of planned tasks completed, 0.0-1.0.
    pub task_completion_ratio: f64,
    /// Average focus-session quality on a 1-5 scale.
    pub avg_focus_quality: f64,
    /// Average number of tracked events per day.
    pub daily_event_volume: f64,
    /// Lookback window the signals were aggregated over.
    pub window_days: u32,
}

/// Five signed deltas, one per trait, each clamped to the bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentVector([f64; TraitKind::COUNT]);

impl AdjustmentVector {
    /// Creates a zeroed vector (the state at session completion).
    pub fn zeroed() -> Self {
        Self([0.0; TraitKind::COUNT])
    }

    /// Returns the accumulated delta for a trait.
    pub fn get(&self, trait_kind: TraitKind) -> f64 {
        self.0[trait_kind.index()]
    }

    /// Adds a delta to a trait's component, saturating at the bound.
    pub fn accumulate(&mut self, trait_kind: TraitKind, delta: f64) {
        let slot = &mut self.0[trait_kind.index()];
        *slot = (*slot + delta).clamp(-ADJUSTMENT_BOUND, ADJUSTMENT_BOUND);
    }

    /// Applies a full round of computed deltas.
    pub fn accumulate_all(&mut self, deltas: &[(TraitKind, f64)]) {
        for &(trait_kind, delta) in deltas {
            self.accumulate(trait_kind, delta);
        }
    }
}

impl Default for AdjustmentVector {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Thresholds and nudge sizes for the overlay.
///
/// The defaults are empirically chosen, not load-bearing invariants; deploys
/// may override any of them through configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentWeights {
    /// Completion ratio above this nudges conscientiousness up.
    pub high_completion_threshold: f64,
    pub high_completion_delta: f64,
    /// Completion ratio below this nudges conscientiousness down.
    pub low_completion_threshold: f64,
    pub low_completion_delta: f64,
    /// Focus quality at or above this nudges openness and conscientiousness.
    pub high_focus_threshold: f64,
    pub high_focus_openness_delta: f64,
    pub high_focus_conscientiousness_delta: f64,
    /// Daily event volume above this nudges extraversion up.
    pub high_volume_threshold: f64,
    pub high_volume_delta: f64,
    /// Daily event volume below this nudges extraversion down.
    pub low_volume_threshold: f64,
    pub low_volume_delta: f64,
}

impl Default for AdjustmentWeights {
    fn default() -> Self {
        Self {
            high_completion_threshold: 0.7,
            high_completion_delta: 0.3,
            low_completion_threshold: 0.3,
            low_completion_delta: -0.2,
            high_focus_threshold: 4.0,
            high_focus_openness_delta: 0.2,
            high_focus_conscientiousness_delta: 0.1,
            high_volume_threshold: 20.0,
            high_volume_delta: 0.3,
            low_volume_threshold: 3.0,
            low_volume_delta: -0.2,
        }
    }
}

impl AdjustmentWeights {
    /// Computes the deltas one overlay run contributes for a snapshot.
    pub fn deltas_for(&self, snapshot: &BehaviorSnapshot) -> Vec<(TraitKind, f64)> {
        let mut deltas = Vec::new();

        if snapshot.task_completion_ratio > self.high_completion_threshold {
            deltas.push((TraitKind::Conscientiousness, self.high_completion_delta));
        } else if snapshot.task_completion_ratio < self.low_completion_threshold {
            deltas.push((TraitKind::Conscientiousness, self.low_completion_delta));
        }

        if snapshot.avg_focus_quality >= self.high_focus_threshold {
            deltas.push((TraitKind::Openness, self.high_focus_openness_delta));
            deltas.push((TraitKind::Conscientiousness, self.high_focus_conscientiousness_delta));
        }

        if snapshot.daily_event_volume > self.high_volume_threshold {
            deltas.push((TraitKind::Extraversion, self.high_volume_delta));
        } else if snapshot.daily_event_volume < self.low_volume_threshold {
            deltas.push((TraitKind::Extraversion, self.low_volume_delta));
        }

        deltas
    }
}
