//! Fixed behavior summarizer.
//!
//! Returns the same pre-configured activity snapshot for every user. Stands
//! in for an analytics-backed summarizer in tests and single-process demos.

use async_trait::async_trait;

use crate::domain::assessment::BehaviorSnapshot;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::BehaviorSummarizer;

/// Behavior summarizer that always answers with a fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct FixedBehaviorSummarizer {
    snapshot: Option<BehaviorSnapshot>,
}

impl FixedBehaviorSummarizer {
    /// Summarizer that reports the given snapshot for every user.
    pub fn new(snapshot: BehaviorSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    /// Summarizer that reports no activity data for any user.
    pub fn empty() -> Self {
        Self { snapshot: None }
    }
}

#[async_trait]
impl BehaviorSummarizer for FixedBehaviorSummarizer {
    async fn summarize(
        &self,
        _user_id: &UserId,
        window_days: u32,
    ) -> Result<Option<BehaviorSnapshot>, DomainError> {
        Ok(self.snapshot.clone().map(|mut s| {
            s.window_days = window_days;
            s
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_snapshot_is_reported_with_requested_window() {
        let summarizer = FixedBehaviorSummarizer::new(BehaviorSnapshot {
            task_completion_ratio: 0.8,
            avg_focus_quality: 4.2,
            daily_event_volume: 12.0,
            window_days: 7,
        });

        let user = UserId::new("user-1").unwrap();
        let snapshot = summarizer.summarize(&user, 14).await.unwrap().unwrap();
        assert_eq!(snapshot.window_days, 14);
        assert!((snapshot.task_completion_ratio - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_summarizer_reports_nothing() {
        let summarizer = FixedBehaviorSummarizer::empty();
        let user = UserId::new("user-1").unwrap();
        assert!(summarizer.summarize(&user, 7).await.unwrap().is_none());
    }
}
