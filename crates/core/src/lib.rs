#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod scoring;
pub mod time;

pub use model::{
    AnswerMap, Attempt, AttemptId, Difficulty, Exam, ExamError, ExamId, OPTION_COUNT, Question,
    QuestionId, Rank,
};
pub use scoring::{QuestionOutcome, QuestionReview, ScoreCard};
pub use time::Clock;
