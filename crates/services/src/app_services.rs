use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::ai::{ChatClient, ChatContentProvider, ChatFeedbackProvider};
use crate::ai::{ContentProvider, FeedbackProvider};
use crate::history::HistoryService;
use crate::sessions::{ExamFlowService, SessionController, TickScheduler};

/// Assembles app-facing services around one attempt log.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    storage: Storage,
    ai_enabled: bool,
    history: Arc<HistoryService>,
    flow: Arc<ExamFlowService>,
}

impl AppServices {
    /// Build services over in-memory storage with chat providers configured
    /// from the environment.
    #[must_use]
    pub fn from_env(clock: Clock) -> Self {
        let client = ChatClient::from_env();
        let ai_enabled = client.enabled();
        let content = Arc::new(ChatContentProvider::new(client.clone(), clock));
        let feedback = Arc::new(ChatFeedbackProvider::new(client));
        let mut services = Self::with_providers(clock, Storage::in_memory(), content, feedback);
        services.ai_enabled = ai_enabled;
        services
    }

    /// Build services from explicit collaborators.
    #[must_use]
    pub fn with_providers(
        clock: Clock,
        storage: Storage,
        content: Arc<dyn ContentProvider>,
        feedback: Arc<dyn FeedbackProvider>,
    ) -> Self {
        let history = Arc::new(HistoryService::new(Arc::clone(&storage.attempts)));
        let flow = Arc::new(ExamFlowService::new(content, feedback));
        Self {
            clock,
            storage,
            ai_enabled: true,
            history,
            flow,
        }
    }

    /// A fresh controller recording into this instance's attempt log.
    #[must_use]
    pub fn controller(&self, scheduler: Box<dyn TickScheduler>) -> SessionController {
        SessionController::new(self.clock, Arc::clone(&self.storage.attempts), scheduler)
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// False when no API key is configured; generation and feedback then
    /// fail or degrade.
    #[must_use]
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn flow(&self) -> Arc<ExamFlowService> {
        Arc::clone(&self.flow)
    }
}
