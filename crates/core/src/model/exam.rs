use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ExamId, QuestionId};

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Structural problems that make an exam unusable for a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam has no questions")]
    NoQuestions,

    #[error("exam duration must be > 0 minutes")]
    ZeroDuration,

    #[error("exam declares {declared} questions but contains {actual}")]
    QuestionCountMismatch { declared: u32, actual: usize },

    #[error("question {question} has {len} options, expected {OPTION_COUNT}")]
    InvalidOptionCount { question: usize, len: usize },

    #[error("question {question} has correct answer {value}, expected 0..{OPTION_COUNT}")]
    InvalidCorrectAnswer { question: usize, value: usize },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: [&str; OPTION_COUNT],
        correct_answer: usize,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            options: options.iter().map(|o| (*o).to_owned()).collect(),
            correct_answer,
        }
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        self.correct_answer == option
    }
}

//
// ─── EXAM ──────────────────────────────────────────────────────────────────────
//

/// A timed assessment.
///
/// Exams arrive from the built-in catalog or from an external content
/// provider, so the fields are public and `validate` must be called before a
/// session accepts one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    pub category: String,
    pub duration_minutes: u32,
    /// Declared count; must match `questions.len()`.
    pub total_questions: u32,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

impl Exam {
    /// Check the structural invariants a session relies on.
    ///
    /// # Errors
    ///
    /// Returns the first `ExamError` found, checking the question list, the
    /// duration, the declared count, then each question in order.
    pub fn validate(&self) -> Result<(), ExamError> {
        if self.questions.is_empty() {
            return Err(ExamError::NoQuestions);
        }
        if self.duration_minutes == 0 {
            return Err(ExamError::ZeroDuration);
        }
        let actual = self.questions.len();
        if usize::try_from(self.total_questions).ok() != Some(actual) {
            return Err(ExamError::QuestionCountMismatch {
                declared: self.total_questions,
                actual,
            });
        }
        for (idx, question) in self.questions.iter().enumerate() {
            if question.options.len() != OPTION_COUNT {
                return Err(ExamError::InvalidOptionCount {
                    question: idx,
                    len: question.options.len(),
                });
            }
            if question.correct_answer >= OPTION_COUNT {
                return Err(ExamError::InvalidCorrectAnswer {
                    question: idx,
                    value: question.correct_answer,
                });
            }
        }
        Ok(())
    }

    /// Full countdown length in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_exam(count: u64) -> Exam {
        let questions = (0..count)
            .map(|i| Question::new(QuestionId::new(i), format!("Q{i}"), ["a", "b", "c", "d"], 1))
            .collect::<Vec<_>>();
        Exam {
            id: ExamId::new(7),
            title: "Sample".into(),
            category: "Testing".into(),
            duration_minutes: 10,
            total_questions: u32::try_from(count).unwrap(),
            difficulty: Difficulty::Easy,
            questions,
        }
    }

    #[test]
    fn well_formed_exam_validates() {
        assert_eq!(sample_exam(3).validate(), Ok(()));
        assert_eq!(sample_exam(3).duration_secs(), 600);
    }

    #[test]
    fn empty_exam_is_rejected() {
        let mut exam = sample_exam(0);
        exam.total_questions = 0;
        assert_eq!(exam.validate(), Err(ExamError::NoQuestions));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut exam = sample_exam(2);
        exam.duration_minutes = 0;
        assert_eq!(exam.validate(), Err(ExamError::ZeroDuration));
    }

    #[test]
    fn declared_count_must_match() {
        let mut exam = sample_exam(3);
        exam.total_questions = 5;
        assert_eq!(
            exam.validate(),
            Err(ExamError::QuestionCountMismatch {
                declared: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn option_list_must_have_four_entries() {
        let mut exam = sample_exam(3);
        exam.questions[1].options.pop();
        assert_eq!(
            exam.validate(),
            Err(ExamError::InvalidOptionCount { question: 1, len: 3 })
        );
    }

    #[test]
    fn correct_answer_must_index_an_option() {
        let mut exam = sample_exam(3);
        exam.questions[2].correct_answer = 4;
        let err = exam.validate().unwrap_err();
        assert_eq!(err, ExamError::InvalidCorrectAnswer { question: 2, value: 4 });
        assert_eq!(
            err.to_string(),
            "question 2 has correct answer 4, expected 0..4"
        );
    }
}
