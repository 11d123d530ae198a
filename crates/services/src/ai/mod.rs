//! Chat-completion backed collaborators: exam generation and coaching feedback.

pub mod client;
pub mod content;
pub mod feedback;

pub use client::{AiConfig, ChatClient, CompletionOptions};
pub use content::{ChatContentProvider, ContentProvider};
pub use feedback::{ChatFeedbackProvider, FeedbackProvider, FeedbackRequest};
