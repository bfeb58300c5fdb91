//! Behavior summarizer port.
//!
//! Supplies the aggregated activity snapshot used to bias generation prompts
//! and to drive the adjustment overlay. Implementations must aggregate: no
//! raw personally identifying records cross this boundary.

use async_trait::async_trait;

use crate::domain::assessment::BehaviorSnapshot;
use crate::domain::foundation::{DomainError, UserId};

/// Port for aggregated recent-activity signals.
#[async_trait]
pub trait BehaviorSummarizer: Send + Sync {
    /// Summarizes the user's recent activity over the given window.
    ///
    /// Returns `None` when there is not enough activity to aggregate; the
    /// caller then skips prompt biasing or the overlay run.
    async fn summarize(
        &self,
        user_id: &UserId,
        window_days: u32,
    ) -> Result<Option<BehaviorSnapshot>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behavior_summarizer_is_object_safe() {
        fn _accepts_dyn(_summarizer: &dyn BehaviorSummarizer) {}
    }
}
