//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{ExamError, ExamId};
use storage::repository::StorageError;

use crate::sessions::Phase;

/// Errors emitted by the session controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("command requires phase {expected:?}, session is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("invalid exam: {0}")]
    InvalidExam(#[from] ExamError),
    #[error("question {index} is out of range (exam has {len})")]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("option {index} is out of range")]
    OptionOutOfRange { index: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ChatClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("AI provider is not configured")]
    Disabled,
    #[error("AI provider returned an empty response")]
    EmptyResponse,
    #[error("AI request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by content providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("topic cannot be empty")]
    EmptyTopic,
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("generated exam could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors emitted by feedback providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Errors emitted while starting an exam through `ExamFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error("no exam with id {0} in the catalog")]
    UnknownExam(ExamId),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
