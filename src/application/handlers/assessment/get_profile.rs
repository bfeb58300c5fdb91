//! GetProfileHandler - read of the most recent completed profile.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::domain::assessment::{
    score_responses, AdjustmentVector, AssessmentError, TraitKind, TraitScores,
};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::AssessmentStore;

/// The reported profile: base scores plus the adjustment overlay.
#[derive(Debug, Clone)]
pub struct CompletedProfile {
    /// Base scores with the adjustment vector applied, clamped to 0-100.
    pub scores: TraitScores,
    /// Unadjusted scores from the questionnaire itself.
    pub base_scores: TraitScores,
    pub adjustments: AdjustmentVector,
    pub completed_at: Timestamp,
    /// Banded description per trait, from the adjusted scores.
    pub descriptions: HashMap<TraitKind, &'static str>,
}

/// Handler for profile reads.
pub struct GetProfileHandler {
    store: Arc<dyn AssessmentStore>,
}

impl GetProfileHandler {
    pub fn new(store: Arc<dyn AssessmentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, owner: &UserId) -> Result<CompletedProfile, AssessmentError> {
        let session = self
            .store
            .find_latest_completed_by_owner(owner)
            .await
            .map_err(|e| AssessmentError::storage(e.to_string()))?
            .ok_or(AssessmentError::ProfileNotFound)?;

        // Self-healing read: the scoring engine is idempotent, so recompute
        // from the response log and prefer that over stored scores that
        // drifted.
        let recomputed = score_responses(session.responses());
        let base_scores = match session.base_scores() {
            Some(stored) if stored == &recomputed => stored.clone(),
            Some(_) => {
                warn!(
                    session_id = %session.id(),
                    "stored scores drifted from response log; using recomputed scores"
                );
                recomputed
            }
            None => {
                warn!(session_id = %session.id(), "completed session missing base scores");
                recomputed
            }
        };

        let scores = base_scores.with_adjustments(session.adjustments());
        let descriptions = TraitKind::ALL
            .iter()
            .map(|&t| (t, t.describe(scores.get(t))))
            .collect();

        Ok(CompletedProfile {
            scores,
            base_scores,
            adjustments: session.adjustments().clone(),
            completed_at: *session.completed_at().expect("completed session has timestamp"),
            descriptions,
        })
    }
}
