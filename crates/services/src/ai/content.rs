use async_trait::async_trait;
use serde::Deserialize;

use exam_core::model::{Difficulty, Exam, ExamId, Question, QuestionId};

use super::client::{ChatClient, CompletionOptions};
use crate::Clock;
use crate::error::GenerationError;

/// Source of exams for a free-text topic.
///
/// Implementations do not validate; the controller rejects malformed exams
/// when they are started.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `GenerationError` if the topic is empty or no exam could be
    /// produced.
    async fn generate(&self, topic: &str) -> Result<Exam, GenerationError>;
}

/// Generates exams through a chat-completions endpoint in JSON mode.
#[derive(Clone)]
pub struct ChatContentProvider {
    client: ChatClient,
    clock: Clock,
}

impl ChatContentProvider {
    #[must_use]
    pub fn new(client: ChatClient, clock: Clock) -> Self {
        Self { client, clock }
    }
}

#[async_trait]
impl ContentProvider for ChatContentProvider {
    async fn generate(&self, topic: &str) -> Result<Exam, GenerationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::EmptyTopic);
        }

        let options = CompletionOptions {
            json: true,
            ..CompletionOptions::default()
        };
        let raw = self.client.complete(&exam_prompt(topic), options).await?;
        let exam = decode_exam(&raw, ExamId::new(self.clock.now_millis()))?;
        tracing::info!(
            topic,
            exam_id = %exam.id,
            questions = exam.questions.len(),
            "generated exam"
        );
        Ok(exam)
    }
}

fn exam_prompt(topic: &str) -> String {
    format!(
        r#"Generate a comprehensive multiple-choice exam about "{topic}". The questions should vary in difficulty.

Respond with a single JSON object and nothing else, using this shape:
{{
  "title": string,
  "category": string,
  "duration": number (minutes),
  "totalQuestions": number,
  "difficulty": "Easy" | "Medium" | "Hard",
  "questions": [
    {{ "id": number, "text": string, "options": [string, string, string, string], "correctAnswer": number (index 0-3 of the correct option) }}
  ]
}}"#
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedExam {
    title: String,
    category: String,
    duration: u32,
    total_questions: u32,
    difficulty: Difficulty,
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestion {
    id: u64,
    text: String,
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<i64>,
}

// Missing or negative answers map past the option range so `Exam::validate`
// reports them as `InvalidCorrectAnswer`.
fn answer_index(raw: Option<i64>) -> usize {
    raw.and_then(|value| usize::try_from(value).ok())
        .unwrap_or(usize::MAX)
}

/// Decode a model reply into an exam with the given id.
fn decode_exam(raw: &str, id: ExamId) -> Result<Exam, GenerationError> {
    let generated: GeneratedExam = serde_json::from_str(strip_fences(raw))?;
    Ok(Exam {
        id,
        title: generated.title,
        category: generated.category,
        duration_minutes: generated.duration,
        total_questions: generated.total_questions,
        difficulty: generated.difficulty,
        questions: generated
            .questions
            .into_iter()
            .map(|q| Question {
                id: QuestionId::new(q.id),
                text: q.text,
                options: q.options,
                correct_answer: answer_index(q.correct_answer),
            })
            .collect(),
    })
}

// Models sometimes wrap JSON in ```json fences even in JSON mode.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
