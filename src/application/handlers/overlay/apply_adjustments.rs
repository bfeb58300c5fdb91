//! ApplyAdjustmentsHandler - periodic behavioral adjustment overlay.
//!
//! Runs on its own schedule, independent of session requests. For each user
//! with a completed assessment it reads an aggregated activity snapshot and
//! folds small bounded deltas into the session's adjustment vector. Base
//! scores are never rewritten; the deltas apply additively at read time.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AssessmentConfig;
use crate::domain::assessment::AssessmentError;
use crate::domain::foundation::UserId;
use crate::ports::{AssessmentStore, BehaviorSummarizer, StoreError};

/// Summary of one full overlay sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayRunReport {
    /// Users whose adjustment vector was updated.
    pub updated: usize,
    /// Users skipped for lack of activity data.
    pub skipped: usize,
    /// Users whose update failed (logged and continued).
    pub failed: usize,
}

/// Handler for the periodic adjustment overlay.
pub struct ApplyAdjustmentsHandler {
    store: Arc<dyn AssessmentStore>,
    summarizer: Arc<dyn BehaviorSummarizer>,
    config: AssessmentConfig,
}

impl ApplyAdjustmentsHandler {
    pub fn new(
        store: Arc<dyn AssessmentStore>,
        summarizer: Arc<dyn BehaviorSummarizer>,
        config: AssessmentConfig,
    ) -> Self {
        Self {
            store,
            summarizer,
            config,
        }
    }

    /// Applies one overlay run for a single user.
    ///
    /// Returns `Ok(false)` when there was nothing to do: no completed
    /// session, no activity snapshot, or a snapshot that produced no deltas.
    pub async fn handle(&self, user_id: &UserId) -> Result<bool, AssessmentError> {
        let Some(mut session) = self
            .store
            .find_latest_completed_by_owner(user_id)
            .await
            .map_err(|e| AssessmentError::storage(e.to_string()))?
        else {
            return Ok(false);
        };

        let snapshot = self
            .summarizer
            .summarize(user_id, self.config.behavior_window_days)
            .await
            .map_err(|e| AssessmentError::storage(e.to_string()))?;
        let Some(snapshot) = snapshot else {
            debug!(user = %user_id, "no activity snapshot; skipping overlay run");
            return Ok(false);
        };

        let deltas = self.config.adjustment_weights.deltas_for(&snapshot);
        if deltas.is_empty() {
            return Ok(false);
        }

        session.apply_adjustment_deltas(&deltas)?;
        self.store.update(&mut session).await.map_err(|e| match e {
            StoreError::VersionConflict { .. } => AssessmentError::ConcurrentModification,
            other => AssessmentError::storage(other.to_string()),
        })?;
        Ok(true)
    }

    /// Sweeps every user with a completed session.
    ///
    /// Individual failures are logged and do not abort the sweep.
    pub async fn run_all(&self) -> Result<OverlayRunReport, AssessmentError> {
        let owners = self
            .store
            .owners_with_completed_sessions()
            .await
            .map_err(|e| AssessmentError::storage(e.to_string()))?;

        let mut report = OverlayRunReport::default();
        for owner in owners {
            match self.handle(&owner).await {
                Ok(true) => report.updated += 1,
                Ok(false) => report.skipped += 1,
                Err(err) => {
                    warn!(user = %owner, error = %err, "overlay run failed for user");
                    report.failed += 1;
                }
            }
        }
        info!(
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            "overlay sweep finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{FixedBehaviorSummarizer, InMemoryAssessmentStore};
    use crate::domain::assessment::{
        AssessmentSession, BehaviorSnapshot, Direction, Question, QuestionSet, QuestionSource,
        TraitKind, ADJUSTMENT_BOUND,
    };
    use crate::domain::foundation::{AssessmentId, LikertValue};

    fn owner() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn snapshot(completion: f64, focus: f64, volume: f64) -> BehaviorSnapshot {
        BehaviorSnapshot {
            task_completion_ratio: completion,
            avg_focus_quality: focus,
            daily_event_volume: volume,
            window_days: 7,
        }
    }

    async fn store_with_completed(user: &UserId) -> Arc<InMemoryAssessmentStore> {
        let store = Arc::new(InMemoryAssessmentStore::new());
        let set = QuestionSet::new(
            TraitKind::ALL
                .iter()
                .map(|&t| {
                    Question::new(
                        format!("{} statement", t.label()),
                        t,
                        Direction::Positive,
                        QuestionSource::Bank,
                    )
                    .unwrap()
                })
                .collect(),
        );
        let mut session = AssessmentSession::start(AssessmentId::new(), user.clone(), set).unwrap();
        for _ in 0..5 {
            session
                .record_answer(LikertValue::try_from_i32(3).unwrap(), 60)
                .unwrap();
        }
        store.save(&session).await.unwrap();
        store
    }

    fn handler(
        store: Arc<InMemoryAssessmentStore>,
        summarizer: FixedBehaviorSummarizer,
    ) -> ApplyAdjustmentsHandler {
        ApplyAdjustmentsHandler::new(store, Arc::new(summarizer), AssessmentConfig::default())
    }

    #[tokio::test]
    async fn high_completion_accumulates_conscientiousness_delta() {
        let user = owner();
        let store = store_with_completed(&user).await;
        let handler = handler(
            store.clone(),
            FixedBehaviorSummarizer::new(snapshot(0.9, 3.0, 10.0)),
        );

        assert!(handler.handle(&user).await.unwrap());
        let session = store
            .find_latest_completed_by_owner(&user)
            .await
            .unwrap()
            .unwrap();
        assert!((session.adjustments().get(TraitKind::Conscientiousness) - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn repeated_runs_saturate_at_bound() {
        let user = owner();
        let store = store_with_completed(&user).await;
        let handler = handler(
            store.clone(),
            FixedBehaviorSummarizer::new(snapshot(0.9, 3.0, 25.0)),
        );

        for _ in 0..50 {
            handler.handle(&user).await.unwrap();
        }
        let session = store
            .find_latest_completed_by_owner(&user)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            session.adjustments().get(TraitKind::Conscientiousness),
            ADJUSTMENT_BOUND
        );
        assert_eq!(
            session.adjustments().get(TraitKind::Extraversion),
            ADJUSTMENT_BOUND
        );
        // Base scores untouched throughout.
        assert_eq!(
            session.base_scores().unwrap().get(TraitKind::Conscientiousness),
            50
        );
    }

    #[tokio::test]
    async fn user_without_completed_session_is_skipped() {
        let store = Arc::new(InMemoryAssessmentStore::new());
        let handler = handler(store, FixedBehaviorSummarizer::new(snapshot(0.9, 3.0, 10.0)));
        assert!(!handler.handle(&owner()).await.unwrap());
    }

    #[tokio::test]
    async fn missing_snapshot_skips_run() {
        let user = owner();
        let store = store_with_completed(&user).await;
        let handler = handler(store, FixedBehaviorSummarizer::empty());
        assert!(!handler.handle(&user).await.unwrap());
    }

    #[tokio::test]
    async fn neutral_snapshot_changes_nothing() {
        let user = owner();
        let store = store_with_completed(&user).await;
        let handler = handler(
            store.clone(),
            FixedBehaviorSummarizer::new(snapshot(0.5, 3.0, 10.0)),
        );
        assert!(!handler.handle(&user).await.unwrap());
        let session = store
            .find_latest_completed_by_owner(&user)
            .await
            .unwrap()
            .unwrap();
        for t in TraitKind::ALL {
            assert_eq!(session.adjustments().get(t), 0.0);
        }
    }

    #[tokio::test]
    async fn run_all_sweeps_every_owner() {
        let alice = UserId::new("alice").unwrap();
        let store = store_with_completed(&alice).await;
        // Second owner with a completed session in the same store.
        let bob = UserId::new("bob").unwrap();
        let set = QuestionSet::new(vec![Question::new(
            "One statement",
            TraitKind::Openness,
            Direction::Positive,
            QuestionSource::Bank,
        )
        .unwrap()]);
        let mut session = AssessmentSession::start(AssessmentId::new(), bob.clone(), set).unwrap();
        session
            .record_answer(LikertValue::try_from_i32(3).unwrap(), 60)
            .unwrap();
        store.save(&session).await.unwrap();

        let handler = handler(
            store.clone(),
            FixedBehaviorSummarizer::new(snapshot(0.9, 3.0, 10.0)),
        );
        let report = handler.run_all().await.unwrap();
        assert_eq!(report.updated, 2);
        assert_eq!(report.failed, 0);
    }
}
