use std::fmt;
use std::sync::Arc;

use exam_core::model::{AnswerMap, Attempt, AttemptId, Exam, OPTION_COUNT, Question};
use exam_core::scoring;
use storage::repository::AttemptLog;

use super::countdown::{Tick, TickScheduler};
use super::progress::{QuestionStatus, SessionProgress};
use super::summary::ResultSummary;
use crate::Clock;
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse state of the controller. Cyclic; `Dashboard` is the initial phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Dashboard,
    InExam,
    Result,
}

/// What a countdown tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_secs: u32 },
    /// The countdown hit zero and this tick submitted the exam.
    Expired(Attempt),
    /// No live countdown to advance (wrong phase, stale or already submitted).
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Transient state of one exam run, from start until return to dashboard.
#[derive(Debug)]
pub struct ExamSession {
    exam: Exam,
    generation: u64,
    current: usize,
    answers: AnswerMap,
    remaining_secs: u32,
    submitted: bool,
    attempt: Option<Attempt>,
    feedback: Option<String>,
}

impl ExamSession {
    fn new(exam: Exam, generation: u64) -> Self {
        Self {
            remaining_secs: exam.duration_secs(),
            exam,
            generation,
            current: 0,
            answers: AnswerMap::new(),
            submitted: false,
            attempt: None,
            feedback: None,
        }
    }

    #[must_use]
    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.exam.question(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u32 {
        self.exam.duration_secs().saturating_sub(self.remaining_secs)
    }

    /// The attempt recorded by submission, once submitted.
    #[must_use]
    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Presentation-agnostic exam state machine.
///
/// All commands run on the caller's thread; ticks and user commands must be
/// serialized onto one execution context. Submission is guarded by a
/// per-session latch, so a manual submit racing the final tick records
/// exactly one attempt.
pub struct SessionController {
    clock: Clock,
    attempts: Arc<dyn AttemptLog>,
    scheduler: Box<dyn TickScheduler>,
    phase: Phase,
    session: Option<ExamSession>,
    generation: u64,
    last_attempt_id: u64,
}

impl SessionController {
    #[must_use]
    pub fn new(
        clock: Clock,
        attempts: Arc<dyn AttemptLog>,
        scheduler: Box<dyn TickScheduler>,
    ) -> Self {
        Self {
            clock,
            attempts,
            scheduler,
            phase: Phase::Dashboard,
            session: None,
            generation: 0,
            last_attempt_id: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn exam(&self) -> Option<&Exam> {
        self.session.as_ref().map(ExamSession::exam)
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(ExamSession::current_index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().and_then(ExamSession::current_question)
    }

    #[must_use]
    pub fn answers(&self) -> Option<&AnswerMap> {
        self.session.as_ref().map(ExamSession::answers)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.session.as_ref().map(ExamSession::remaining_secs)
    }

    #[must_use]
    pub fn attempt(&self) -> Option<&Attempt> {
        self.session.as_ref().and_then(ExamSession::attempt)
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.session.as_ref().and_then(ExamSession::feedback)
    }

    /// True while the countdown scheduler is armed.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_armed()
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        let session = self.session.as_ref()?;
        let total = session.exam.questions.len();
        let answered = session.answers.len();
        Some(SessionProgress {
            total,
            answered,
            unanswered: total.saturating_sub(answered),
            current: session.current,
            remaining_secs: session.remaining_secs,
        })
    }

    /// Per-question navigator state; empty outside a session.
    #[must_use]
    pub fn navigator(&self) -> Vec<QuestionStatus> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        (0..session.exam.questions.len())
            .map(|idx| {
                if idx == session.current {
                    QuestionStatus::Current
                } else if session.answers.is_answered(idx) {
                    QuestionStatus::Answered
                } else {
                    QuestionStatus::NotVisited
                }
            })
            .collect()
    }

    /// Data for the result phase; `None` before submission.
    #[must_use]
    pub fn result_summary(&self) -> Option<ResultSummary> {
        let session = self.session.as_ref()?;
        let attempt = session.attempt.clone()?;
        let review = scoring::review(&session.exam, &session.answers);
        Some(ResultSummary::new(attempt, review))
    }

    /// Begin `exam`, moving from `Dashboard` to `InExam`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside `Dashboard` and
    /// `SessionError::InvalidExam` if the exam fails validation. In both cases
    /// the controller is left untouched.
    pub fn start_exam(&mut self, exam: Exam) -> Result<(), SessionError> {
        self.expect_phase(Phase::Dashboard)?;
        if let Err(err) = exam.validate() {
            tracing::warn!(exam_id = %exam.id, %err, "rejected exam");
            return Err(err.into());
        }

        self.generation += 1;
        tracing::info!(
            exam_id = %exam.id,
            title = %exam.title,
            questions = exam.questions.len(),
            duration_secs = exam.duration_secs(),
            generation = self.generation,
            "exam started"
        );
        self.session = Some(ExamSession::new(exam, self.generation));
        self.phase = Phase::InExam;
        self.scheduler.arm(self.generation);
        Ok(())
    }

    /// Record `option` for `question`; re-selecting overwrites.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside `InExam`, or an out-of-range
    /// error for a bad question or option index.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Result<(), SessionError> {
        let session = self.live_session_mut()?;
        let len = session.exam.questions.len();
        if question >= len {
            return Err(SessionError::QuestionOutOfRange {
                index: question,
                len,
            });
        }
        if option >= OPTION_COUNT {
            return Err(SessionError::OptionOutOfRange { index: option });
        }
        session.answers.select(question, option);
        tracing::debug!(question, option, "answer selected");
        Ok(())
    }

    /// Record `option` for the question currently shown.
    ///
    /// # Errors
    ///
    /// See [`SessionController::select_answer`].
    pub fn select_current(&mut self, option: usize) -> Result<(), SessionError> {
        let current = self.live_session()?.current;
        self.select_answer(current, option)
    }

    /// Move the question pointer, clamping into the exam's range.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside `InExam`.
    pub fn navigate(&mut self, target: i64) -> Result<usize, SessionError> {
        let session = self.live_session_mut()?;
        let last = session.exam.questions.len().saturating_sub(1);
        let clamped = usize::try_from(target.max(0))
            .unwrap_or(usize::MAX)
            .min(last);
        session.current = clamped;
        tracing::debug!(target, current = clamped, "navigated");
        Ok(clamped)
    }

    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside `InExam`.
    pub fn next(&mut self) -> Result<usize, SessionError> {
        let current = self.current_as_i64()?;
        self.navigate(current.saturating_add(1))
    }

    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside `InExam`.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        let current = self.current_as_i64()?;
        self.navigate(current.saturating_sub(1))
    }

    /// Advance the countdown by one second.
    ///
    /// Reaching zero submits synchronously before returning. Outside a live
    /// countdown this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the expiry submission could not be
    /// recorded; the controller is in `Result` regardless.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        if self.phase != Phase::InExam {
            return Ok(TickOutcome::Ignored);
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(TickOutcome::Ignored);
        };
        if session.submitted || session.remaining_secs == 0 {
            return Ok(TickOutcome::Ignored);
        }

        session.remaining_secs -= 1;
        let remaining_secs = session.remaining_secs;
        if remaining_secs > 0 {
            return Ok(TickOutcome::Running { remaining_secs });
        }

        tracing::info!(exam_id = %session.exam.id, "time expired, submitting");
        Ok(match self.submit()? {
            Some(attempt) => TickOutcome::Expired(attempt),
            None => TickOutcome::Ignored,
        })
    }

    /// Apply a scheduler-delivered tick if it belongs to the live session.
    ///
    /// # Errors
    ///
    /// See [`SessionController::tick`].
    pub fn handle_tick(&mut self, tick: Tick) -> Result<TickOutcome, SessionError> {
        let live = self.phase == Phase::InExam
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.generation == tick.generation);
        if !live {
            tracing::debug!(generation = tick.generation, "dropping stale tick");
            return Ok(TickOutcome::Ignored);
        }
        self.tick()
    }

    /// Score the session, record the attempt and move to `Result`.
    ///
    /// Only the first call of a session does anything; later calls, and calls
    /// outside `InExam`, return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the attempt log rejects the attempt.
    /// The controller is still in `Result` with the attempt available.
    pub fn submit(&mut self) -> Result<Option<Attempt>, SessionError> {
        let ready =
            self.phase == Phase::InExam && self.session.as_ref().is_some_and(|s| !s.submitted);
        if !ready {
            tracing::debug!(phase = ?self.phase, "submit ignored");
            return Ok(None);
        }

        self.scheduler.disarm();
        let id = self.next_attempt_id();
        let date = self.clock.today();
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        session.submitted = true;

        let card = scoring::score(&session.exam, &session.answers);
        let attempt = Attempt::new(id, &session.exam, date, card, session.time_spent_secs());
        session.attempt = Some(attempt.clone());
        self.phase = Phase::Result;

        tracing::info!(
            attempt_id = %attempt.id(),
            exam_id = %attempt.exam_id(),
            score = attempt.score(),
            total = attempt.total(),
            percentage = attempt.percentage(),
            time_spent_secs = attempt.time_spent_secs(),
            "exam submitted"
        );

        if let Err(err) = self.attempts.prepend(attempt.clone()) {
            tracing::error!(attempt_id = %attempt.id(), %err, "failed to record attempt");
            return Err(err.into());
        }
        Ok(Some(attempt))
    }

    /// Leave `Result`, discarding the exam, answers and any feedback.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` while an exam is running.
    pub fn return_to_dashboard(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Dashboard => Ok(()),
            Phase::InExam => Err(SessionError::WrongPhase {
                expected: Phase::Result,
                actual: Phase::InExam,
            }),
            Phase::Result => {
                self.scheduler.disarm();
                self.session = None;
                self.phase = Phase::Dashboard;
                Ok(())
            }
        }
    }

    /// Walk away from a running exam without recording an attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside `InExam`.
    pub fn abandon_exam(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::InExam)?;
        self.scheduler.disarm();
        if let Some(session) = self.session.take() {
            tracing::info!(
                exam_id = %session.exam.id,
                remaining_secs = session.remaining_secs,
                "exam abandoned"
            );
        }
        self.phase = Phase::Dashboard;
        Ok(())
    }

    pub(crate) fn set_feedback(&mut self, text: String) -> Result<(), SessionError> {
        self.expect_phase(Phase::Result)?;
        if let Some(session) = self.session.as_mut() {
            session.feedback = Some(text);
        }
        Ok(())
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn live_session(&self) -> Result<&ExamSession, SessionError> {
        self.expect_phase(Phase::InExam)?;
        self.session.as_ref().ok_or(SessionError::WrongPhase {
            expected: Phase::InExam,
            actual: self.phase,
        })
    }

    fn live_session_mut(&mut self) -> Result<&mut ExamSession, SessionError> {
        self.expect_phase(Phase::InExam)?;
        let actual = self.phase;
        self.session.as_mut().ok_or(SessionError::WrongPhase {
            expected: Phase::InExam,
            actual,
        })
    }

    fn current_as_i64(&self) -> Result<i64, SessionError> {
        let current = self.live_session()?.current;
        Ok(i64::try_from(current).unwrap_or(i64::MAX))
    }

    // Time-derived, strictly increasing within this controller.
    fn next_attempt_id(&mut self) -> AttemptId {
        let candidate = self
            .clock
            .now_millis()
            .max(self.last_attempt_id.saturating_add(1));
        self.last_attempt_id = candidate;
        AttemptId::new(candidate)
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("phase", &self.phase)
            .field("session", &self.session)
            .field("generation", &self.generation)
            .field("ticking", &self.scheduler.is_armed())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::countdown::ManualScheduler;
    use exam_core::catalog;
    use exam_core::model::{Difficulty, ExamError, ExamId, Rank};
    use exam_core::scoring::QuestionOutcome;
    use exam_core::time::fixed_clock;
    use storage::repository::{InMemoryAttemptLog, StorageError};

    // Catalog exam 1: five questions, fifteen minutes, answers [1, 1, 2, 1, 2].
    fn react_exam() -> Exam {
        catalog::find(ExamId::new(1)).unwrap()
    }

    fn controller() -> (SessionController, ManualScheduler, InMemoryAttemptLog) {
        let scheduler = ManualScheduler::new();
        let log = InMemoryAttemptLog::new();
        let controller = SessionController::new(
            fixed_clock(),
            Arc::new(log.clone()),
            Box::new(scheduler.clone()),
        );
        (controller, scheduler, log)
    }

    fn tick_n(controller: &mut SessionController, n: u32) {
        for _ in 0..n {
            controller.tick().unwrap();
        }
    }

    #[test]
    fn start_exam_resets_session_and_arms_countdown() {
        let (mut controller, scheduler, _) = controller();
        controller.start_exam(react_exam()).unwrap();

        assert_eq!(controller.phase(), Phase::InExam);
        assert_eq!(controller.current_index(), Some(0));
        assert_eq!(controller.remaining_secs(), Some(900));
        assert!(controller.answers().unwrap().is_empty());
        assert_eq!(scheduler.armed_generation(), Some(1));
    }

    #[test]
    fn invalid_exam_keeps_dashboard() {
        let (mut controller, scheduler, _) = controller();
        let mut exam = react_exam();
        exam.total_questions = 6;

        let err = controller.start_exam(exam).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidExam(ExamError::QuestionCountMismatch {
                declared: 6,
                actual: 5
            })
        );
        assert_eq!(controller.phase(), Phase::Dashboard);
        assert!(controller.session().is_none());
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn exam_without_questions_is_rejected() {
        let (mut controller, _, _) = controller();
        let exam = Exam {
            id: ExamId::new(9),
            title: "Empty".into(),
            category: "None".into(),
            duration_minutes: 5,
            total_questions: 0,
            difficulty: Difficulty::Easy,
            questions: Vec::new(),
        };
        assert_eq!(
            controller.start_exam(exam),
            Err(SessionError::InvalidExam(ExamError::NoQuestions))
        );
    }

    #[test]
    fn commands_outside_exam_are_rejected() {
        let (mut controller, _, _) = controller();
        let wrong = SessionError::WrongPhase {
            expected: Phase::InExam,
            actual: Phase::Dashboard,
        };
        assert_eq!(controller.select_answer(0, 0), Err(wrong.clone()));
        assert_eq!(controller.navigate(1), Err(wrong.clone()));
        assert_eq!(controller.abandon_exam(), Err(wrong));
        assert_eq!(controller.tick(), Ok(TickOutcome::Ignored));
        assert_eq!(controller.submit(), Ok(None));
    }

    #[test]
    fn start_is_rejected_while_exam_running() {
        let (mut controller, _, _) = controller();
        controller.start_exam(react_exam()).unwrap();
        assert_eq!(
            controller.start_exam(react_exam()),
            Err(SessionError::WrongPhase {
                expected: Phase::Dashboard,
                actual: Phase::InExam
            })
        );
    }

    #[test]
    fn select_answer_validates_indices_and_overwrites() {
        let (mut controller, _, _) = controller();
        controller.start_exam(react_exam()).unwrap();

        assert_eq!(
            controller.select_answer(5, 0),
            Err(SessionError::QuestionOutOfRange { index: 5, len: 5 })
        );
        assert_eq!(
            controller.select_answer(0, 4),
            Err(SessionError::OptionOutOfRange { index: 4 })
        );

        controller.select_answer(2, 0).unwrap();
        controller.select_answer(2, 3).unwrap();
        assert_eq!(controller.answers().unwrap().get(2), Some(3));
        assert_eq!(controller.answers().unwrap().len(), 1);
    }

    #[test]
    fn navigate_clamps_into_range() {
        let (mut controller, _, _) = controller();
        controller.start_exam(react_exam()).unwrap();

        assert_eq!(controller.navigate(-5), Ok(0));
        assert_eq!(controller.navigate(99), Ok(4));
        assert_eq!(controller.next(), Ok(4));
        assert_eq!(controller.previous(), Ok(3));
        assert_eq!(controller.navigate(i64::MIN), Ok(0));
        assert_eq!(controller.previous(), Ok(0));
    }

    #[test]
    fn select_current_follows_the_pointer() {
        let (mut controller, _, _) = controller();
        controller.start_exam(react_exam()).unwrap();
        controller.navigate(3).unwrap();
        controller.select_current(1).unwrap();

        assert_eq!(controller.answers().unwrap().get(3), Some(1));
        assert_eq!(
            controller.navigator(),
            vec![
                QuestionStatus::NotVisited,
                QuestionStatus::NotVisited,
                QuestionStatus::NotVisited,
                QuestionStatus::Current,
                QuestionStatus::NotVisited,
            ]
        );
        controller.navigate(0).unwrap();
        assert_eq!(controller.navigator()[3], QuestionStatus::Answered);
    }

    #[test]
    fn manual_submit_scores_and_records_attempt() {
        let earlier = Attempt::from_parts(
            AttemptId::new(1),
            ExamId::new(2),
            "Advanced JavaScript Basics",
            fixed_clock().today(),
            2,
            4,
            300,
        );
        let scheduler = ManualScheduler::new();
        let log = InMemoryAttemptLog::with_history(vec![earlier.clone()]);
        let mut controller = SessionController::new(
            fixed_clock(),
            Arc::new(log.clone()),
            Box::new(scheduler.clone()),
        );
        controller.start_exam(react_exam()).unwrap();
        for (question, option) in [(0, 1), (1, 1), (2, 2), (3, 0)] {
            controller.select_answer(question, option).unwrap();
        }
        tick_n(&mut controller, 500);

        let attempt = controller.submit().unwrap().expect("first submit records");
        assert_eq!(attempt.score(), 3);
        assert_eq!(attempt.total(), 5);
        assert_eq!(attempt.percentage(), 60);
        assert_eq!(attempt.time_spent_secs(), 500);
        assert_eq!(attempt.exam_title(), "Modern React Development");
        assert_eq!(attempt.display_date(), "Nov 14, 2023");

        assert_eq!(controller.phase(), Phase::Result);
        assert!(!scheduler.is_armed());
        assert_eq!(log.list().unwrap(), vec![attempt, earlier]);
    }

    #[test]
    fn double_submit_records_once() {
        let (mut controller, _, log) = controller();
        controller.start_exam(react_exam()).unwrap();

        assert!(controller.submit().unwrap().is_some());
        assert_eq!(controller.submit(), Ok(None));
        assert_eq!(log.len().unwrap(), 1);
    }

    #[test]
    fn expiry_auto_submits_exactly_once() {
        let (mut controller, scheduler, log) = controller();
        controller.start_exam(react_exam()).unwrap();

        tick_n(&mut controller, 899);
        assert_eq!(controller.remaining_secs(), Some(1));
        let outcome = controller.tick().unwrap();
        let TickOutcome::Expired(attempt) = outcome else {
            panic!("final tick should submit, got {outcome:?}");
        };
        assert_eq!(attempt.score(), 0);
        assert_eq!(attempt.percentage(), 0);
        assert_eq!(attempt.time_spent_secs(), 900);

        assert_eq!(controller.tick(), Ok(TickOutcome::Ignored));
        assert_eq!(controller.submit(), Ok(None));
        assert_eq!(log.len().unwrap(), 1);
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn manual_submit_before_final_tick_wins() {
        let (mut controller, _, log) = controller();
        controller.start_exam(react_exam()).unwrap();
        tick_n(&mut controller, 899);

        let attempt = controller.submit().unwrap().unwrap();
        assert_eq!(controller.tick(), Ok(TickOutcome::Ignored));
        assert_eq!(attempt.time_spent_secs(), 899);
        assert_eq!(log.len().unwrap(), 1);
        assert_eq!(controller.remaining_secs(), Some(1));
    }

    #[test]
    fn countdown_is_monotonic_and_never_negative() {
        let (mut controller, _, _) = controller();
        let mut exam = react_exam();
        exam.duration_minutes = 1;
        controller.start_exam(exam).unwrap();

        let mut previous = controller.remaining_secs().unwrap();
        for _ in 0..120 {
            controller.tick().unwrap();
            let now = controller.remaining_secs().unwrap();
            assert!(now <= previous);
            previous = now;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn stale_ticks_do_not_touch_a_new_session() {
        let (mut controller, scheduler, _) = controller();
        controller.start_exam(react_exam()).unwrap();
        let old_tick = scheduler.next_tick().unwrap();
        controller.submit().unwrap();
        controller.return_to_dashboard().unwrap();

        controller.start_exam(react_exam()).unwrap();
        assert_eq!(controller.handle_tick(old_tick), Ok(TickOutcome::Ignored));
        assert_eq!(controller.remaining_secs(), Some(900));

        let live_tick = scheduler.next_tick().unwrap();
        assert_eq!(
            controller.handle_tick(live_tick),
            Ok(TickOutcome::Running { remaining_secs: 899 })
        );
    }

    #[test]
    fn return_to_dashboard_discards_session() {
        let (mut controller, _, log) = controller();
        controller.start_exam(react_exam()).unwrap();
        assert!(matches!(
            controller.return_to_dashboard(),
            Err(SessionError::WrongPhase { .. })
        ));

        controller.submit().unwrap();
        controller.set_feedback("Keep going".into()).unwrap();
        assert_eq!(controller.feedback(), Some("Keep going"));

        controller.return_to_dashboard().unwrap();
        assert_eq!(controller.phase(), Phase::Dashboard);
        assert!(controller.session().is_none());
        assert!(controller.feedback().is_none());
        assert_eq!(log.len().unwrap(), 1);
    }

    #[test]
    fn abandon_stops_countdown_without_recording() {
        let (mut controller, scheduler, log) = controller();
        controller.start_exam(react_exam()).unwrap();
        controller.abandon_exam().unwrap();

        assert_eq!(controller.phase(), Phase::Dashboard);
        assert!(!scheduler.is_armed());
        assert_eq!(log.len().unwrap(), 0);
    }

    #[test]
    fn attempt_ids_increase_under_a_fixed_clock() {
        let (mut controller, _, log) = controller();
        for _ in 0..2 {
            controller.start_exam(react_exam()).unwrap();
            controller.submit().unwrap();
            controller.return_to_dashboard().unwrap();
        }
        let ids: Vec<_> = log.list().unwrap().iter().map(|a| a.id().value()).collect();
        assert_eq!(ids, vec![1_700_000_000_001, 1_700_000_000_000]);
    }

    #[test]
    fn log_failure_still_lands_in_result() {
        let seeded = Attempt::from_parts(
            AttemptId::new(1_700_000_000_000),
            ExamId::new(1),
            "Seed",
            fixed_clock().today(),
            1,
            1,
            1,
        );
        let log = InMemoryAttemptLog::with_history(vec![seeded]);
        let mut controller = SessionController::new(
            fixed_clock(),
            Arc::new(log),
            Box::new(ManualScheduler::new()),
        );
        controller.start_exam(react_exam()).unwrap();

        assert_eq!(
            controller.submit(),
            Err(SessionError::Storage(StorageError::Conflict(1_700_000_000_000)))
        );
        assert_eq!(controller.phase(), Phase::Result);
        assert!(controller.attempt().is_some());
        assert_eq!(controller.submit(), Ok(None));
    }

    #[test]
    fn result_summary_reviews_every_question() {
        let (mut controller, _, _) = controller();
        controller.start_exam(react_exam()).unwrap();
        for question in 0..5 {
            let correct = controller.exam().unwrap().questions[question].correct_answer;
            controller.select_answer(question, correct).unwrap();
        }
        controller.select_answer(4, 0).unwrap();
        assert!(controller.result_summary().is_none());
        controller.submit().unwrap();

        let summary = controller.result_summary().unwrap();
        assert_eq!(summary.attempt.percentage(), 80);
        assert!(summary.passed);
        assert_eq!(summary.rank, Rank::B);
        assert_eq!(summary.review.len(), 5);
        assert_eq!(summary.review[4].outcome, QuestionOutcome::Incorrect);
        assert_eq!(summary.review[4].selected, Some(0));
    }
}
