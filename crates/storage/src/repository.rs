use exam_core::model::{Attempt, ExamId};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by attempt log adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict: attempt {0} already recorded")]
    Conflict(u64),

    #[error("attempt log unavailable: {0}")]
    Unavailable(String),
}

/// Append-only history of completed attempts, most recent first.
///
/// Index 0 is always the newest attempt; callers looking for "the last
/// attempt" rely on that. Entries are never updated or removed.
///
/// The contract is synchronous: recording happens inside the submit
/// transition, which may itself run from a countdown tick.
pub trait AttemptLog: Send + Sync {
    /// Insert `attempt` at the front of the log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if an attempt with the same id exists.
    fn prepend(&self, attempt: Attempt) -> Result<(), StorageError>;

    /// Every attempt, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    fn list(&self) -> Result<Vec<Attempt>, StorageError>;

    /// The most recent attempt, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    fn latest(&self) -> Result<Option<Attempt>, StorageError>;

    /// Attempts for one exam, keeping recency order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    fn filter_by_exam(&self, exam_id: ExamId) -> Result<Vec<Attempt>, StorageError>;

    /// Number of recorded attempts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    fn len(&self) -> Result<usize, StorageError>;
}

/// Process-lifetime attempt log.
///
/// The mutex doubles as the append lock, so several writers sharing one log
/// still see a single total order of prepends.
#[derive(Clone, Default)]
pub struct InMemoryAttemptLog {
    attempts: Arc<Mutex<VecDeque<Attempt>>>,
}

impl InMemoryAttemptLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from attempts already ordered newest first.
    #[must_use]
    pub fn with_history(attempts: Vec<Attempt>) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(attempts.into())),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, VecDeque<Attempt>>, StorageError> {
        self.attempts
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl AttemptLog for InMemoryAttemptLog {
    fn prepend(&self, attempt: Attempt) -> Result<(), StorageError> {
        let mut guard = self.guard()?;
        if guard.iter().any(|a| a.id() == attempt.id()) {
            return Err(StorageError::Conflict(attempt.id().value()));
        }
        guard.push_front(attempt);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Attempt>, StorageError> {
        Ok(self.guard()?.iter().cloned().collect())
    }

    fn latest(&self) -> Result<Option<Attempt>, StorageError> {
        Ok(self.guard()?.front().cloned())
    }

    fn filter_by_exam(&self, exam_id: ExamId) -> Result<Vec<Attempt>, StorageError> {
        let guard = self.guard()?;
        Ok(guard
            .iter()
            .filter(|a| a.exam_id() == exam_id)
            .cloned()
            .collect())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.guard()?.len())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub attempts: Arc<dyn AttemptLog>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let attempts: Arc<dyn AttemptLog> = Arc::new(InMemoryAttemptLog::new());
        Self { attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::AttemptId;
    use exam_core::time::fixed_now;

    fn attempt(id: u64, exam: u64) -> Attempt {
        Attempt::from_parts(
            AttemptId::new(id),
            ExamId::new(exam),
            format!("Exam {exam}"),
            fixed_now().date_naive(),
            1,
            2,
            60,
        )
    }

    #[test]
    fn prepend_puts_newest_first() {
        let log = InMemoryAttemptLog::new();
        log.prepend(attempt(1, 1)).unwrap();
        log.prepend(attempt(2, 1)).unwrap();

        let ids: Vec<_> = log.list().unwrap().iter().map(|a| a.id().value()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(log.latest().unwrap().unwrap().id(), AttemptId::new(2));
    }

    #[test]
    fn duplicate_ids_conflict() {
        let log = InMemoryAttemptLog::new();
        log.prepend(attempt(5, 1)).unwrap();
        assert_eq!(log.prepend(attempt(5, 2)), Err(StorageError::Conflict(5)));
        assert_eq!(log.len().unwrap(), 1);
    }

    #[test]
    fn filter_keeps_recency_order() {
        let log = InMemoryAttemptLog::new();
        for (id, exam) in [(1, 2), (2, 1), (3, 2), (4, 2), (5, 1)] {
            log.prepend(attempt(id, exam)).unwrap();
        }

        let ids: Vec<_> = log
            .filter_by_exam(ExamId::new(2))
            .unwrap()
            .iter()
            .map(|a| a.id().value())
            .collect();
        assert_eq!(ids, vec![4, 3, 1]);
    }

    #[test]
    fn empty_log_has_no_latest() {
        let storage = Storage::in_memory();
        assert!(storage.attempts.latest().unwrap().is_none());
        assert_eq!(storage.attempts.len().unwrap(), 0);
    }
}
