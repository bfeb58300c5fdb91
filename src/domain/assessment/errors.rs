//! Assessment-specific error types.

use thiserror::Error;

use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode};

/// Errors surfaced by the assessment engine.
///
/// Every variant carries enough structured detail for a caller to decide the
/// next action without string-parsing; `is_retryable` classifies whether a
/// retry can ever succeed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssessmentError {
    /// A completed assessment is still inside its cooldown window.
    #[error("assessment cooldown active: {days_remaining} day(s) remaining")]
    Cooldown { days_remaining: u64 },

    /// Neither the generator nor the bank could supply a full question set.
    #[error("no questions available; safe to retry")]
    NoQuestionsAvailable,

    /// Answer value outside the 1-5 Likert range. Caller bug.
    #[error("invalid response value {value}: must be between 1 and 5")]
    InvalidResponseValue { value: i32 },

    /// No session with that id belongs to the caller.
    #[error("assessment session not found: {0}")]
    SessionNotFound(AssessmentId),

    /// The session has already been completed.
    #[error("assessment session already completed")]
    AlreadyCompleted,

    /// A concurrent writer updated the session first. Safe to retry after
    /// re-reading current state.
    #[error("session was modified concurrently")]
    ConcurrentModification,

    /// No completed session exists to report a profile for.
    #[error("no completed assessment found")]
    ProfileNotFound,

    /// Infrastructure failure from the store.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AssessmentError {
    pub fn storage(message: impl Into<String>) -> Self {
        AssessmentError::Storage(message.into())
    }

    /// Whether a later retry can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AssessmentError::Cooldown { .. }
                | AssessmentError::NoQuestionsAvailable
                | AssessmentError::ConcurrentModification
                | AssessmentError::Storage(_)
        )
    }

    /// Maps to the foundation error code for transport layers.
    pub fn code(&self) -> ErrorCode {
        match self {
            AssessmentError::Cooldown { .. } => ErrorCode::CooldownActive,
            AssessmentError::NoQuestionsAvailable => ErrorCode::NoQuestionsAvailable,
            AssessmentError::InvalidResponseValue { .. } => ErrorCode::InvalidResponseValue,
            AssessmentError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            AssessmentError::AlreadyCompleted => ErrorCode::AlreadyCompleted,
            AssessmentError::ConcurrentModification => ErrorCode::ConcurrentModification,
            AssessmentError::ProfileNotFound => ErrorCode::ProfileNotFound,
            AssessmentError::Storage(_) => ErrorCode::StorageError,
        }
    }
}

impl From<DomainError> for AssessmentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::AlreadyCompleted => AssessmentError::AlreadyCompleted,
            ErrorCode::CooldownActive => {
                let days_remaining = err
                    .details
                    .get("days_remaining")
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(1);
                AssessmentError::Cooldown { days_remaining }
            }
            ErrorCode::ConcurrentModification => AssessmentError::ConcurrentModification,
            _ => AssessmentError::Storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_carries_structured_days() {
        let err = AssessmentError::Cooldown { days_remaining: 14 };
        assert_eq!(
            err.to_string(),
            "assessment cooldown active: 14 day(s) remaining"
        );
        assert_eq!(err.code(), ErrorCode::CooldownActive);
    }

    #[test]
    fn retryable_classification() {
        assert!(AssessmentError::Cooldown { days_remaining: 1 }.is_retryable());
        assert!(AssessmentError::NoQuestionsAvailable.is_retryable());
        assert!(AssessmentError::ConcurrentModification.is_retryable());

        assert!(!AssessmentError::InvalidResponseValue { value: 9 }.is_retryable());
        assert!(!AssessmentError::AlreadyCompleted.is_retryable());
        assert!(!AssessmentError::SessionNotFound(AssessmentId::new()).is_retryable());
    }

    #[test]
    fn domain_error_maps_already_completed() {
        let err: AssessmentError =
            DomainError::new(ErrorCode::AlreadyCompleted, "done").into();
        assert_eq!(err, AssessmentError::AlreadyCompleted);
    }
}
