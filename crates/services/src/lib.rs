#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod error;
pub mod history;
pub mod sessions;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use error::{ChatError, FeedbackError, GenerationError, SessionError, StartError};
pub use history::{HistoryService, HistoryStats};
pub use sessions::{
    ExamFlowService, ExamSession, IntervalScheduler, ManualScheduler, Phase, QuestionStatus,
    ResultSummary, SessionController, SessionProgress, Tick, TickOutcome, TickScheduler,
};
