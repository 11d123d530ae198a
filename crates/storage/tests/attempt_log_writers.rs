use std::sync::Arc;
use std::thread;

use exam_core::model::{Attempt, AttemptId, ExamId};
use exam_core::time::fixed_now;
use storage::repository::{AttemptLog, InMemoryAttemptLog, Storage};

fn attempt(id: u64, exam: u64) -> Attempt {
    Attempt::from_parts(
        AttemptId::new(id),
        ExamId::new(exam),
        "Writers",
        fixed_now().date_naive(),
        3,
        5,
        120,
    )
}

#[test]
fn concurrent_writers_never_lose_attempts() {
    let log: Arc<dyn AttemptLog> = Arc::new(InMemoryAttemptLog::new());

    let handles: Vec<_> = (0..4_u64)
        .map(|writer| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for n in 0..25_u64 {
                    log.prepend(attempt(writer * 100 + n, writer)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(log.len().unwrap(), 100);
    for writer in 0..4_u64 {
        let ids: Vec<_> = log
            .filter_by_exam(ExamId::new(writer))
            .unwrap()
            .iter()
            .map(|a| a.id().value())
            .collect();
        let expected: Vec<_> = (0..25_u64).rev().map(|n| writer * 100 + n).collect();
        assert_eq!(ids, expected, "writer {writer} keeps its own recency order");
    }
}

#[test]
fn seeded_history_is_shared_between_clones() {
    let log = InMemoryAttemptLog::with_history(vec![attempt(2, 2), attempt(1, 1)]);
    let storage = Storage {
        attempts: Arc::new(log.clone()),
    };

    storage.attempts.prepend(attempt(3, 1)).unwrap();

    let latest = log.latest().unwrap().expect("clone sees the new attempt");
    assert_eq!(latest.id(), AttemptId::new(3));
    assert_eq!(log.len().unwrap(), 3);
}
