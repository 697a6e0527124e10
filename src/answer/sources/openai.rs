//! Hosted chat-completion source (OpenAI-compatible API).
//!
//! Sends the question as the sole user turn with a persona-specific system
//! prompt and extracts the first completion's text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::answer::config::OpenAiConfig;
use crate::answer::error::{AnswerError, AnswerResult};
use crate::answer::sources::AnswerSource;
use crate::answer::types::Mode;

/// Sampling temperature used for completions.
const TEMPERATURE: f32 = 0.7;

/// Token budget per completion.
const MAX_TOKENS: u32 = 600;

/// Answer source backed by a hosted chat-completion provider.
pub struct OpenAiSource {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiSource {
    /// Create a new hosted chat-completion source.
    #[must_use]
    pub const fn new(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Chat-completion request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// One chat message in the request.
#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completion response body.
#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

/// One completion choice.
#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

/// The message inside a completion choice.
#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatCompletion {
    /// Extract the first choice's trimmed text, if any.
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

#[async_trait]
impl AnswerSource for OpenAiSource {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn resolve(&self, question: &str, mode: Mode) -> AnswerResult<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: mode.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AnswerError::AccessDenied(
                "chat-completion API key rejected".to_string(),
            ));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnswerError::RateLimited(60));
        }
        if !status.is_success() {
            return Err(AnswerError::UpstreamStatus(status.as_u16()));
        }

        let completion: ChatCompletion = response.json().await?;
        completion.into_text().ok_or(AnswerError::EmptyAnswer)
    }
}
