mod answers;
mod attempt;
mod exam;
mod ids;

pub use answers::AnswerMap;
pub use attempt::{Attempt, PASS_THRESHOLD_PERCENT, Rank};
pub use exam::{Difficulty, Exam, ExamError, OPTION_COUNT, Question};
pub use ids::{AttemptId, ExamId, ParseIdError, QuestionId};
