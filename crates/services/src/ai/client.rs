use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection settings for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    /// Read `EXAM_AI_API_KEY`, `EXAM_AI_BASE_URL` and `EXAM_AI_MODEL`.
    ///
    /// Returns `None` when no usable API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_values(
            env::var("EXAM_AI_API_KEY").ok(),
            env::var("EXAM_AI_BASE_URL").ok(),
            env::var("EXAM_AI_MODEL").ok(),
        )
    }

    #[must_use]
    pub fn from_values(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Option<Self> {
        let api_key = api_key?;
        if api_key.trim().is_empty() {
            return None;
        }
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Some(Self {
            base_url: non_blank(base_url).unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            api_key,
            model: non_blank(model).unwrap_or_else(|| DEFAULT_MODEL.into()),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Sampling knobs for one completion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub top_p: Option<f32>,
    /// Ask the endpoint for a JSON object response.
    pub json: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: None,
            json: false,
        }
    }
}

/// Thin chat-completions client shared by the providers.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: Option<AiConfig>,
}

impl ChatClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Send `prompt` as a single user message and return the trimmed reply.
    ///
    /// # Errors
    ///
    /// Returns `ChatError` when the client is disabled, the request fails,
    /// or the response carries no content.
    pub async fn complete(
        &self,
        prompt: &str,
        options: CompletionOptions,
    ) -> Result<String, ChatError> {
        let config = self.config.as_ref().ok_or(ChatError::Disabled)?;
        let payload = ChatRequest::new(&config.model, prompt, options);

        tracing::debug!(model = %config.model, json = options.json, "chat completion request");
        let response = self
            .client
            .post(config.completions_url())
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    fn new(model: &str, prompt: &str, options: CompletionOptions) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: options.temperature,
            top_p: options.top_p,
            response_format: options.json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
