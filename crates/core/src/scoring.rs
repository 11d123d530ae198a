//! Pure scoring of an exam against a learner's selections.
//!
//! Percentages round half up (`62.5` becomes `63`) and are computed in integer
//! arithmetic, so the result never depends on float formatting.

use crate::model::{AnswerMap, Exam, Question};

/// Outcome of scoring one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCard {
    /// Correctly answered questions.
    pub score: u32,
    /// Declared question count of the exam.
    pub total: u32,
    pub percentage: u32,
}

/// How a single question went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOutcome {
    Correct,
    Incorrect,
    Skipped,
}

/// Per-question line of the answer review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionReview {
    pub index: usize,
    pub selected: Option<usize>,
    pub correct: usize,
    pub outcome: QuestionOutcome,
}

/// `round(score / total * 100)` with ties rounding up; 0 when `total` is 0.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score);
    let total = u64::from(total);
    let rounded = (score * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Count matching selections over the first `total_questions` questions.
#[must_use]
pub fn score(exam: &Exam, answers: &AnswerMap) -> ScoreCard {
    let score = scored_questions(exam)
        .filter(|(idx, question)| answered_correctly(question, answers.get(*idx)))
        .count();
    let score = u32::try_from(score).unwrap_or(u32::MAX);

    ScoreCard {
        score,
        total: exam.total_questions,
        percentage: percentage(score, exam.total_questions),
    }
}

/// Texts of every question not answered correctly, skipped ones included.
#[must_use]
pub fn missed_questions<'a>(exam: &'a Exam, answers: &AnswerMap) -> Vec<&'a str> {
    scored_questions(exam)
        .filter(|(idx, question)| !answered_correctly(question, answers.get(*idx)))
        .map(|(_, question)| question.text.as_str())
        .collect()
}

/// Answer review for the result screen, in question order.
#[must_use]
pub fn review(exam: &Exam, answers: &AnswerMap) -> Vec<QuestionReview> {
    scored_questions(exam)
        .map(|(index, question)| {
            let selected = answers.get(index);
            let outcome = match selected {
                None => QuestionOutcome::Skipped,
                Some(option) if question.is_correct(option) => QuestionOutcome::Correct,
                Some(_) => QuestionOutcome::Incorrect,
            };
            QuestionReview {
                index,
                selected,
                correct: question.correct_answer,
                outcome,
            }
        })
        .collect()
}

fn answered_correctly(question: &Question, selected: Option<usize>) -> bool {
    selected.is_some_and(|option| question.is_correct(option))
}

fn scored_questions(exam: &Exam) -> impl Iterator<Item = (usize, &Question)> {
    let declared = usize::try_from(exam.total_questions).unwrap_or(usize::MAX);
    exam.questions.iter().enumerate().take(declared)
}
