//! Assessment store port.
//!
//! Persistence contract for `AssessmentSession` aggregates. Implementations
//! must provide transactional update semantics: session mutation uses a
//! compare-and-swap on the stored version so concurrent answer submissions
//! are rejected rather than interleaved, and the one-in-progress-session-
//! per-owner invariant is enforced at the storage layer (e.g. a partial
//! unique index on owner + state = in_progress).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::assessment::AssessmentSession;
use crate::domain::foundation::{AssessmentId, UserId};

/// Store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The stored version did not match the expected one; a concurrent
    /// writer got there first.
    #[error("version conflict on session {id}: expected {expected}, found {found}")]
    VersionConflict {
        id: AssessmentId,
        expected: u64,
        found: u64,
    },

    /// Saving would create a second in-progress session for the owner.
    #[error("owner {0} already has an in-progress session")]
    InProgressExists(UserId),

    /// Session does not exist.
    #[error("session {0} not found")]
    NotFound(AssessmentId),

    /// Backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend(message.into())
    }
}

/// Repository port for assessment session persistence.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Saves a new session.
    ///
    /// # Errors
    ///
    /// - `InProgressExists` if the owner already has an in-progress session
    /// - `Backend` on persistence failure
    async fn save(&self, session: &AssessmentSession) -> Result<(), StoreError>;

    /// Updates an existing session with optimistic concurrency control.
    ///
    /// The update succeeds only if the stored version equals
    /// `session.version()`; on success the stored version is incremented and
    /// written back into `session`.
    ///
    /// # Errors
    ///
    /// - `VersionConflict` if another writer updated the session first
    /// - `NotFound` if the session does not exist
    async fn update(&self, session: &mut AssessmentSession) -> Result<(), StoreError>;

    /// Finds a session by id.
    async fn find_by_id(&self, id: &AssessmentId) -> Result<Option<AssessmentSession>, StoreError>;

    /// Finds the owner's in-progress session, if any.
    async fn find_in_progress_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<AssessmentSession>, StoreError>;

    /// Finds the owner's most recently completed session, if any.
    async fn find_latest_completed_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<AssessmentSession>, StoreError>;

    /// Lists owners with at least one completed session (overlay job input).
    async fn owners_with_completed_sessions(&self) -> Result<Vec<UserId>, StoreError>;
}
