use std::sync::Arc;

use exam_core::model::{Attempt, ExamId};
use storage::repository::{AttemptLog, StorageError};

/// Dashboard statistics over recorded attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub tests_taken: usize,
    /// Mean percentage, rounded half up; 0 with no attempts.
    pub average_percentage: u32,
    /// Total time spent, in minutes rounded half up.
    pub study_minutes: u64,
}

impl HistoryStats {
    #[must_use]
    pub fn from_attempts(attempts: &[Attempt]) -> Self {
        let tests_taken = attempts.len();
        let count = u64::try_from(tests_taken).unwrap_or(u64::MAX);
        let percent_sum: u64 = attempts.iter().map(|a| u64::from(a.percentage())).sum();
        let seconds: u64 = attempts.iter().map(|a| u64::from(a.time_spent_secs())).sum();

        let average_percentage = if count == 0 {
            0
        } else {
            u32::try_from((percent_sum * 2 + count) / (count * 2)).unwrap_or(u32::MAX)
        };

        Self {
            tests_taken,
            average_percentage,
            study_minutes: (seconds + 30) / 60,
        }
    }
}

/// Read-side queries over the attempt log.
#[derive(Clone)]
pub struct HistoryService {
    attempts: Arc<dyn AttemptLog>,
}

impl HistoryService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptLog>) -> Self {
        Self { attempts }
    }

    /// Attempts newest first, optionally limited to one exam.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    pub fn list(&self, filter: Option<ExamId>) -> Result<Vec<Attempt>, StorageError> {
        match filter {
            Some(exam_id) => self.attempts.filter_by_exam(exam_id),
            None => self.attempts.list(),
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    pub fn latest(&self) -> Result<Option<Attempt>, StorageError> {
        self.attempts.latest()
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    pub fn stats(&self, filter: Option<ExamId>) -> Result<HistoryStats, StorageError> {
        Ok(HistoryStats::from_attempts(&self.list(filter)?))
    }
}
