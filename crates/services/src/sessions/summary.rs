use exam_core::model::{Attempt, Rank};
use exam_core::scoring::QuestionReview;

/// Everything the result phase shows about a finished session.
///
/// No pre-formatted strings; the presentation layer decides how to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub attempt: Attempt,
    pub passed: bool,
    pub rank: Rank,
    pub review: Vec<QuestionReview>,
}

impl ResultSummary {
    #[must_use]
    pub fn new(attempt: Attempt, review: Vec<QuestionReview>) -> Self {
        Self {
            passed: attempt.passed(),
            rank: attempt.rank(),
            attempt,
            review,
        }
    }
}
