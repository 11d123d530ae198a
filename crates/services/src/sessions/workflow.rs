use std::sync::Arc;

use exam_core::catalog;
use exam_core::model::ExamId;
use exam_core::scoring;

use super::controller::{Phase, SessionController};
use crate::ai::{ContentProvider, FeedbackProvider, FeedbackRequest};
use crate::error::{ChatError, FeedbackError, SessionError, StartError};

/// Shown when the feedback provider fails.
pub const FEEDBACK_UNAVAILABLE: &str = "Unable to generate coaching feedback at this moment.";

/// Shown when the feedback provider answers with nothing.
pub const FEEDBACK_EMPTY: &str =
    "I couldn't analyze your results at this time. Great job on completing the test!";

/// Orchestrates the asynchronous collaborators around a session controller.
///
/// Provider calls happen only from `Dashboard` (generation) or `Result`
/// (feedback), never while a countdown is running.
#[derive(Clone)]
pub struct ExamFlowService {
    content: Arc<dyn ContentProvider>,
    feedback: Arc<dyn FeedbackProvider>,
}

impl ExamFlowService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentProvider>, feedback: Arc<dyn FeedbackProvider>) -> Self {
        Self { content, feedback }
    }

    /// Start a built-in exam.
    ///
    /// # Errors
    ///
    /// Returns `StartError::UnknownExam` for an id not in the catalog, or
    /// `StartError::Session` if the controller refuses to start.
    pub fn start_from_catalog(
        &self,
        session: &mut SessionController,
        exam_id: ExamId,
    ) -> Result<(), StartError> {
        let exam = catalog::find(exam_id).ok_or(StartError::UnknownExam(exam_id))?;
        session.start_exam(exam)?;
        Ok(())
    }

    /// Generate an exam for `topic` and start it.
    ///
    /// # Errors
    ///
    /// Returns `StartError::Generation` if the provider fails and
    /// `StartError::Session` if the generated exam is invalid or the
    /// controller is not on the dashboard. The controller stays in
    /// `Dashboard` on every error.
    pub async fn generate_and_start(
        &self,
        session: &mut SessionController,
        topic: &str,
    ) -> Result<(), StartError> {
        if session.phase() != Phase::Dashboard {
            return Err(SessionError::WrongPhase {
                expected: Phase::Dashboard,
                actual: session.phase(),
            }
            .into());
        }

        let exam = self.content.generate(topic).await.map_err(|err| {
            tracing::warn!(topic, %err, "exam generation failed");
            err
        })?;
        session.start_exam(exam)?;
        Ok(())
    }

    /// Ask for coaching feedback on the finished session and store it.
    ///
    /// Provider problems never surface as errors; they degrade to a fixed
    /// message. Feedback already fetched for this session is returned as is.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside `Result`.
    pub async fn fetch_feedback(
        &self,
        session: &mut SessionController,
    ) -> Result<String, SessionError> {
        if let Some(existing) = session.feedback() {
            return Ok(existing.to_string());
        }
        let request = feedback_request(session)?;

        let text = match self.feedback.feedback(&request).await {
            Ok(text) if text.trim().is_empty() => FEEDBACK_EMPTY.to_string(),
            Ok(text) => text,
            Err(FeedbackError::Chat(ChatError::EmptyResponse)) => FEEDBACK_EMPTY.to_string(),
            Err(err) => {
                tracing::warn!(%err, "feedback unavailable");
                FEEDBACK_UNAVAILABLE.to_string()
            }
        };

        session.set_feedback(text.clone())?;
        Ok(text)
    }
}

fn feedback_request(session: &SessionController) -> Result<FeedbackRequest, SessionError> {
    let wrong_phase = || SessionError::WrongPhase {
        expected: Phase::Result,
        actual: session.phase(),
    };
    if session.phase() != Phase::Result {
        return Err(wrong_phase());
    }
    let (Some(exam), Some(answers), Some(attempt)) =
        (session.exam(), session.answers(), session.attempt())
    else {
        return Err(wrong_phase());
    };

    Ok(FeedbackRequest {
        exam_title: attempt.exam_title().to_string(),
        score: attempt.score(),
        total: attempt.total(),
        missed: scoring::missed_questions(exam, answers)
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
