mod controller;
pub mod countdown;
mod progress;
mod summary;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{ExamSession, Phase, SessionController, TickOutcome};
pub use countdown::{IntervalScheduler, ManualScheduler, TICK_PERIOD, Tick, TickScheduler};
pub use progress::{QuestionStatus, SessionProgress};
pub use summary::ResultSummary;
pub use workflow::{ExamFlowService, FEEDBACK_EMPTY, FEEDBACK_UNAVAILABLE};
