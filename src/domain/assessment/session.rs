//! AssessmentSession aggregate.
//!
//! Owns the lifecycle of one questionnaire attempt: question set issued at
//! start, append-only response log, cursor, completion scores, cooldown
//! stamp, and the behavioral adjustment vector for the completed attempt.
//!
//! # Invariants
//!
//! - `responses.len() == cursor` at all times
//! - `cursor <= question_set.len()`
//! - state is `Completed` iff `cursor == question_set.len()` and base scores
//!   are set
//! - at most one `InProgress` session per owner (enforced by the store)

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AssessmentId, DomainError, ErrorCode, LikertValue, Timestamp, UserId,
};

use super::{
    score_responses, AdjustmentVector, Question, QuestionSet, Response, TraitKind, TraitScores,
};

/// Lifecycle state of an assessment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Questions issued, not all answered.
    InProgress,
    /// All questions answered and base scores computed.
    Completed,
    /// Discarded without scoring (force-new restart or corruption recovery).
    Abandoned,
}

/// Aggregate root for a single assessment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSession {
    id: AssessmentId,
    owner: UserId,
    state: SessionState,
    question_set: QuestionSet,
    responses: Vec<Response>,
    cursor: usize,
    base_scores: Option<TraitScores>,
    adjustments: AdjustmentVector,
    started_at: Timestamp,
    completed_at: Option<Timestamp>,
    next_eligible_at: Option<Timestamp>,
    /// Optimistic concurrency token, incremented by the store on update.
    version: u64,
}

impl AssessmentSession {
    /// Starts a new in-progress session at cursor 0.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the question set is empty
    pub fn start(
        id: AssessmentId,
        owner: UserId,
        question_set: QuestionSet,
    ) -> Result<Self, DomainError> {
        if question_set.is_empty() {
            return Err(DomainError::validation(
                "question_set",
                "Question set cannot be empty",
            ));
        }
        Ok(Self {
            id,
            owner,
            state: SessionState::InProgress,
            question_set,
            responses: Vec::new(),
            cursor: 0,
            base_scores: None,
            adjustments: AdjustmentVector::zeroed(),
            started_at: Timestamp::now(),
            completed_at: None,
            next_eligible_at: None,
            version: 0,
        })
    }

    /// Reconstitutes a session from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AssessmentId,
        owner: UserId,
        state: SessionState,
        question_set: QuestionSet,
        responses: Vec<Response>,
        cursor: usize,
        base_scores: Option<TraitScores>,
        adjustments: AdjustmentVector,
        started_at: Timestamp,
        completed_at: Option<Timestamp>,
        next_eligible_at: Option<Timestamp>,
        version: u64,
    ) -> Self {
        Self {
            id,
            owner,
            state,
            question_set,
            responses,
            cursor,
            base_scores,
            adjustments,
            started_at,
            completed_at,
            next_eligible_at,
            version,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &AssessmentId {
        &self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn question_set(&self) -> &QuestionSet {
        &self.question_set
    }

    /// Total number of questions in this attempt.
    pub fn total_questions(&self) -> usize {
        self.question_set.len()
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Next unanswered index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn base_scores(&self) -> Option<&TraitScores> {
        self.base_scores.as_ref()
    }

    pub fn adjustments(&self) -> &AdjustmentVector {
        &self.adjustments
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn next_eligible_at(&self) -> Option<&Timestamp> {
        self.next_eligible_at.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sets the version (store-side only, after a successful CAS update).
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// The question at the current cursor, if any remain.
    pub fn current_question(&self) -> Option<&Question> {
        self.question_set.get(self.cursor)
    }

    /// Checks the cursor/log invariant.
    ///
    /// A stored session can violate this only through external corruption;
    /// callers treat a `false` here as unrecoverable and discard the session.
    pub fn is_cursor_consistent(&self) -> bool {
        self.responses.len() == self.cursor && self.cursor <= self.question_set.len()
    }

    /// Live scores over the responses recorded so far (for progress display).
    pub fn live_scores(&self) -> TraitScores {
        score_responses(&self.responses)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Records an answer for the question at the current cursor.
    ///
    /// Advances the cursor; if this was the last question, finalizes the
    /// session: computes base scores, stamps completion time, and sets the
    /// next-eligible-start time to completion + `cooldown_secs`.
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` if the session is not in progress
    pub fn record_answer(
        &mut self,
        value: LikertValue,
        cooldown_secs: u64,
    ) -> Result<(), DomainError> {
        if self.state != SessionState::InProgress {
            return Err(DomainError::new(
                ErrorCode::AlreadyCompleted,
                "Session is not in progress",
            ));
        }
        let question = self.question_set.get(self.cursor).ok_or_else(|| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Cursor is past the end of the question set",
            )
        })?;

        self.responses.push(Response::record(question, self.cursor, value));
        self.cursor += 1;

        if self.cursor == self.question_set.len() {
            let completed_at = Timestamp::now();
            self.base_scores = Some(score_responses(&self.responses));
            self.completed_at = Some(completed_at);
            self.next_eligible_at = Some(completed_at.plus_secs(cooldown_secs));
            self.adjustments = AdjustmentVector::zeroed();
            self.state = SessionState::Completed;
        }
        Ok(())
    }

    /// Discards an in-progress session without scoring it.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is not in progress
    pub fn abandon(&mut self) -> Result<(), DomainError> {
        if self.state != SessionState::InProgress {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only in-progress sessions can be abandoned",
            ));
        }
        self.state = SessionState::Abandoned;
        Ok(())
    }

    /// Accumulates overlay deltas into the adjustment vector.
    ///
    /// Base scores are never rewritten; each component saturates at its bound.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is not completed
    pub fn apply_adjustment_deltas(
        &mut self,
        deltas: &[(TraitKind, f64)],
    ) -> Result<(), DomainError> {
        if self.state != SessionState::Completed {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Adjustments apply only to completed sessions",
            ));
        }
        self.adjustments.accumulate_all(deltas);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cooldown
    // ─────────────────────────────────────────────────────────────────────────

    /// Seconds until a new session may be started, or `None` if eligible.
    ///
    /// A start is allowed exactly at the eligibility instant.
    pub fn cooldown_remaining_secs(&self, now: &Timestamp) -> Option<u64> {
        let eligible_at = self.next_eligible_at?;
        if now.is_before(&eligible_at) {
            Some(eligible_at.duration_since(now).num_seconds().max(0) as u64)
        } else {
            None
        }
    }

    /// Whole-day estimate of the remaining cooldown (ceiling, minimum 1).
    pub fn cooldown_days_remaining(&self, now: &Timestamp) -> Option<u64> {
        self.cooldown_remaining_secs(now)
            .map(|secs| ((secs + 86_399) / 86_400).max(1))
    }
}
