use std::fmt::Write as _;

use async_trait::async_trait;

use exam_core::scoring;

use super::client::{ChatClient, CompletionOptions};
use crate::error::FeedbackError;

/// Score summary handed to a feedback provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub exam_title: String,
    pub score: u32,
    pub total: u32,
    /// Texts of the questions answered wrong or skipped, in exam order.
    pub missed: Vec<String>,
}

impl FeedbackRequest {
    #[must_use]
    pub fn percentage(&self) -> u32 {
        scoring::percentage(self.score, self.total)
    }

    /// The coaching prompt sent to the model.
    #[must_use]
    pub fn prompt(&self) -> String {
        let mut missed = String::new();
        for question in &self.missed {
            let _ = writeln!(missed, "- {question}");
        }
        format!(
            r#"A student just finished an exam on "{title}".
Score: {score}/{total} ({percentage}%)

They struggled with these concepts/questions:
{missed}
Provide:
1. A supportive and motivating opening.
2. A brief, high-level explanation of the missed concepts.
3. Three actionable study tips tailored to these specific weaknesses.
4. A confident closing.

Keep it concise, friendly, and encouraging. Use Markdown for formatting."#,
            title = self.exam_title,
            score = self.score,
            total = self.total,
            percentage = self.percentage(),
        )
    }
}

/// Source of post-result coaching text.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `FeedbackError` if no feedback could be produced.
    async fn feedback(&self, request: &FeedbackRequest) -> Result<String, FeedbackError>;
}

#[derive(Clone)]
pub struct ChatFeedbackProvider {
    client: ChatClient,
}

impl ChatFeedbackProvider {
    #[must_use]
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedbackProvider for ChatFeedbackProvider {
    async fn feedback(&self, request: &FeedbackRequest) -> Result<String, FeedbackError> {
        let options = CompletionOptions {
            temperature: 0.7,
            top_p: Some(0.8),
            json: false,
        };
        Ok(self.client.complete(&request.prompt(), options).await?)
    }
}
