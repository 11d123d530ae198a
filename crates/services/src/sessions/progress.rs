/// Aggregated view of exam progress, useful for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    /// Zero-based index of the question on screen.
    pub current: usize,
    pub remaining_secs: u32,
}

/// Navigator state of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Current,
    Answered,
    NotVisited,
}
