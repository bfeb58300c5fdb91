//! StartAssessmentHandler - command handler for starting or resuming an
//! assessment session.

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::questions::AdaptiveQuestionProvider;
use crate::config::AssessmentConfig;
use crate::domain::assessment::{
    sample_balanced, AssessmentError, AssessmentSession, BehaviorSnapshot,
};
use crate::domain::foundation::{AssessmentId, Timestamp, UserId};
use crate::ports::{AssessmentStore, BehaviorSummarizer, StoreError};

use super::IssuedQuestion;

/// Command to start (or resume) an assessment.
#[derive(Debug, Clone)]
pub struct StartAssessmentCommand {
    pub owner: UserId,
    /// Discard any in-progress session and start over.
    pub force_new: bool,
}

/// Result of a successful start or resume.
#[derive(Debug, Clone)]
pub struct StartAssessmentResult {
    pub session_id: AssessmentId,
    /// The next question to present.
    pub question: IssuedQuestion,
    /// Zero-based index of that question.
    pub position: usize,
    pub total: usize,
    /// True when an existing in-progress session was resumed.
    pub resumed: bool,
}

/// Handler for starting assessments.
pub struct StartAssessmentHandler {
    store: Arc<dyn AssessmentStore>,
    /// Absent when no generator is configured; every set then comes from the bank.
    provider: Option<Arc<AdaptiveQuestionProvider>>,
    summarizer: Option<Arc<dyn BehaviorSummarizer>>,
    config: AssessmentConfig,
}

impl StartAssessmentHandler {
    pub fn new(
        store: Arc<dyn AssessmentStore>,
        provider: Option<Arc<AdaptiveQuestionProvider>>,
        summarizer: Option<Arc<dyn BehaviorSummarizer>>,
        config: AssessmentConfig,
    ) -> Self {
        Self {
            store,
            provider,
            summarizer,
            config,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartAssessmentCommand,
    ) -> Result<StartAssessmentResult, AssessmentError> {
        // 1. Resume or discard any in-progress session.
        if let Some(mut session) = self
            .store
            .find_in_progress_by_owner(&cmd.owner)
            .await
            .map_err(|e| AssessmentError::storage(e.to_string()))?
        {
            let corrupt = !session.is_cursor_consistent() || session.current_question().is_none();
            if !cmd.force_new && !corrupt {
                let question = session.current_question().map(IssuedQuestion::from_question);
                return Ok(StartAssessmentResult {
                    session_id: *session.id(),
                    question: question.expect("in-progress session has a current question"),
                    position: session.cursor(),
                    total: session.total_questions(),
                    resumed: true,
                });
            }
            if corrupt {
                warn!(
                    session_id = %session.id(),
                    cursor = session.cursor(),
                    total = session.total_questions(),
                    "discarding corrupt in-progress session"
                );
            }
            session
                .abandon()
                .map_err(|e| AssessmentError::storage(e.to_string()))?;
            self.store
                .update(&mut session)
                .await
                .map_err(map_store_error)?;
        }

        // 2. Cooldown gate against the most recent completed session.
        let latest = self
            .store
            .find_latest_completed_by_owner(&cmd.owner)
            .await
            .map_err(|e| AssessmentError::storage(e.to_string()))?;
        if let Some(completed) = latest {
            let now = Timestamp::now();
            if let Some(days_remaining) = completed.cooldown_days_remaining(&now) {
                return Err(AssessmentError::Cooldown { days_remaining });
            }
        }

        // 3. Acquire a question set: generator first, bank fallback.
        let question_set = match self.generated_set(&cmd.owner).await {
            Some(set) => set,
            None => {
                info!(owner = %cmd.owner, "using question bank fallback");
                sample_balanced(self.config.total_questions, &mut rand::thread_rng())
            }
        };
        if question_set.is_empty() {
            return Err(AssessmentError::NoQuestionsAvailable);
        }

        // 4. Create and persist the session.
        let session =
            AssessmentSession::start(AssessmentId::new(), cmd.owner.clone(), question_set)
                .map_err(|e| AssessmentError::storage(e.to_string()))?;
        self.store.save(&session).await.map_err(map_store_error)?;

        let question = session
            .current_question()
            .map(IssuedQuestion::from_question)
            .expect("fresh session has a first question");

        Ok(StartAssessmentResult {
            session_id: *session.id(),
            question,
            position: 0,
            total: session.total_questions(),
            resumed: false,
        })
    }

    /// Runs the adaptive provider inside the overall generation budget.
    ///
    /// Timeouts and generation failures both resolve to `None`; the caller
    /// falls back to the bank.
    async fn generated_set(
        &self,
        owner: &UserId,
    ) -> Option<crate::domain::assessment::QuestionSet> {
        let provider = self.provider.as_ref()?;
        let context = self.behavior_context(owner).await;
        match tokio::time::timeout(
            self.config.generation_timeout(),
            provider.provide(self.config.total_questions, context.as_ref()),
        )
        .await
        {
            Ok(set) => set,
            Err(_) => {
                warn!(owner = %owner, "question generation exceeded the overall timeout");
                None
            }
        }
    }

    async fn behavior_context(&self, owner: &UserId) -> Option<BehaviorSnapshot> {
        let summarizer = self.summarizer.as_ref()?;
        match summarizer
            .summarize(owner, self.config.behavior_window_days)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(err) => {
                // Prompt biasing is best-effort; generation proceeds without it.
                warn!(owner = %owner, error = %err, "behavior summary unavailable");
                None
            }
        }
    }
}

fn map_store_error(err: StoreError) -> AssessmentError {
    match err {
        StoreError::VersionConflict { .. } | StoreError::InProgressExists(_) => {
            AssessmentError::ConcurrentModification
        }
        StoreError::NotFound(id) => AssessmentError::SessionNotFound(id),
        StoreError::Backend(message) => AssessmentError::Storage(message),
    }
}
