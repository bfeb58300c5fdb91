//! GetStatusHandler - read-only report of a user's assessment state.

use std::sync::Arc;
use tracing::warn;

use crate::domain::assessment::AssessmentError;
use crate::domain::foundation::{AssessmentId, Timestamp, UserId};
use crate::ports::AssessmentStore;

/// A user's current position in the assessment lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessmentStatus {
    /// No blocking session or cooldown; a new assessment may start.
    Startable,
    /// An in-progress session exists and can be resumed.
    Resumable {
        session_id: AssessmentId,
        answered: usize,
        total: usize,
    },
    /// A completed assessment is inside its cooldown window.
    CooldownActive { days_remaining: u64 },
}

/// Handler for status queries. Pure read; never mutates.
pub struct GetStatusHandler {
    store: Arc<dyn AssessmentStore>,
}

impl GetStatusHandler {
    pub fn new(store: Arc<dyn AssessmentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, owner: &UserId) -> Result<AssessmentStatus, AssessmentError> {
        if let Some(session) = self
            .store
            .find_in_progress_by_owner(owner)
            .await
            .map_err(|e| AssessmentError::storage(e.to_string()))?
        {
            if session.is_cursor_consistent() {
                return Ok(AssessmentStatus::Resumable {
                    session_id: *session.id(),
                    answered: session.cursor(),
                    total: session.total_questions(),
                });
            }
            // Corrupt cursor: report as startable; start() performs the
            // actual discard since status reads never mutate.
            warn!(session_id = %session.id(), "in-progress session has inconsistent cursor");
        }

        let latest = self
            .store
            .find_latest_completed_by_owner(owner)
            .await
            .map_err(|e| AssessmentError::storage(e.to_string()))?;

        if let Some(session) = latest {
            let now = Timestamp::now();
            if let Some(days_remaining) = session.cooldown_days_remaining(&now) {
                return Ok(AssessmentStatus::CooldownActive { days_remaining });
            }
        }

        Ok(AssessmentStatus::Startable)
    }
}
