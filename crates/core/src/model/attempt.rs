use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::exam::Exam;
use crate::model::ids::{AttemptId, ExamId};
use crate::scoring::{self, ScoreCard};

/// Minimum percentage counted as a pass.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

//
// ─── RANK ──────────────────────────────────────────────────────────────────────
//

/// Letter band shown next to a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    SPlus,
    A,
    B,
    C,
    F,
}

impl Rank {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => Rank::SPlus,
            90..=99 => Rank::A,
            80..=89 => Rank::B,
            70..=79 => Rank::C,
            _ => Rank::F,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rank::SPlus => "S+",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::F => "F",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// Immutable record of one completed exam session.
///
/// The exam id and title are copied at submission time so the record stays
/// meaningful after a generated exam is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    id: AttemptId,
    exam_id: ExamId,
    exam_title: String,
    date: NaiveDate,
    score: u32,
    total: u32,
    percentage: u32,
    time_spent_secs: u32,
}

impl Attempt {
    /// Build an attempt for `exam` from a computed score card.
    #[must_use]
    pub fn new(
        id: AttemptId,
        exam: &Exam,
        date: NaiveDate,
        card: ScoreCard,
        time_spent_secs: u32,
    ) -> Self {
        Self {
            id,
            exam_id: exam.id,
            exam_title: exam.title.clone(),
            date,
            score: card.score,
            total: card.total,
            percentage: card.percentage,
            time_spent_secs,
        }
    }

    /// Rehydrate an attempt recorded elsewhere (seed data, imports).
    ///
    /// The percentage is derived from `score` and `total` so it can never
    /// disagree with them.
    #[must_use]
    pub fn from_parts(
        id: AttemptId,
        exam_id: ExamId,
        exam_title: impl Into<String>,
        date: NaiveDate,
        score: u32,
        total: u32,
        time_spent_secs: u32,
    ) -> Self {
        Self {
            id,
            exam_id,
            exam_title: exam_title.into(),
            date,
            score,
            total,
            percentage: scoring::percentage(score, total),
            time_spent_secs,
        }
    }

    #[must_use]
    pub fn id(&self) -> AttemptId {
        self.id
    }

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    #[must_use]
    pub fn exam_title(&self) -> &str {
        &self.exam_title
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Date rendered the way the history list shows it, e.g. `Oct 24, 2023`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }

    /// Number of correct answers.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u32 {
        self.time_spent_secs
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_THRESHOLD_PERCENT
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        Rank::from_percentage(self.percentage)
    }
}
