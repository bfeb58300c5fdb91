//! In-memory assessment store.
//!
//! Implements the `AssessmentStore` port over a `RwLock`-guarded map. The
//! compare-and-swap update and the single-in-progress-session-per-owner rule
//! are enforced here the same way a relational backend would enforce them
//! with a version column and a partial unique index.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::assessment::{AssessmentSession, SessionState};
use crate::domain::foundation::{AssessmentId, UserId};
use crate::ports::{AssessmentStore, StoreError};

/// In-memory implementation of the `AssessmentStore` port.
#[derive(Default)]
pub struct InMemoryAssessmentStore {
    sessions: RwLock<HashMap<AssessmentId, AssessmentSession>>,
}

impl InMemoryAssessmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, for test assertions.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().unwrap().is_empty()
    }
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn save(&self, session: &AssessmentSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().unwrap();

        if session.state() == SessionState::InProgress {
            let duplicate = sessions.values().any(|s| {
                s.owner() == session.owner()
                    && s.state() == SessionState::InProgress
                    && s.id() != session.id()
            });
            if duplicate {
                return Err(StoreError::InProgressExists(session.owner().clone()));
            }
        }

        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &mut AssessmentSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().unwrap();

        let stored = sessions
            .get(session.id())
            .ok_or_else(|| StoreError::NotFound(*session.id()))?;

        if stored.version() != session.version() {
            return Err(StoreError::VersionConflict {
                id: *session.id(),
                expected: session.version(),
                found: stored.version(),
            });
        }

        session.set_version(session.version() + 1);
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AssessmentId) -> Result<Option<AssessmentSession>, StoreError> {
        Ok(self.sessions.read().unwrap().get(id).cloned())
    }

    async fn find_in_progress_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<AssessmentSession>, StoreError> {
        Ok(self
            .sessions
            .read()
            .unwrap()
            .values()
            .find(|s| s.owner() == owner && s.state() == SessionState::InProgress)
            .cloned())
    }

    async fn find_latest_completed_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<AssessmentSession>, StoreError> {
        Ok(self
            .sessions
            .read()
            .unwrap()
            .values()
            .filter(|s| s.owner() == owner && s.state() == SessionState::Completed)
            .max_by_key(|s| s.completed_at().map(|t| t.as_unix_secs()))
            .cloned())
    }

    async fn owners_with_completed_sessions(&self) -> Result<Vec<UserId>, StoreError> {
        let sessions = self.sessions.read().unwrap();
        let mut owners: Vec<UserId> = sessions
            .values()
            .filter(|s| s.state() == SessionState::Completed)
            .map(|s| s.owner().clone())
            .collect();
        owners.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        owners.dedup();
        Ok(owners)
    }
}
