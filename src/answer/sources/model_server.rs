//! Remote model server source.
//!
//! Posts the question to a self-hosted model backend at `{base}/ask` and
//! maps its reply through a fixed field set. Historically the backend has
//! answered under `answer`, `reply`, or `result` depending on revision, so
//! all three are accepted, in that order of preference.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::answer::config::ModelServerConfig;
use crate::answer::error::{AnswerError, AnswerResult};
use crate::answer::sources::AnswerSource;
use crate::answer::types::Mode;

/// Answer source backed by a deployed model server.
pub struct ModelServerSource {
    client: reqwest::Client,
    config: ModelServerConfig,
}

impl ModelServerSource {
    /// Create a new model server source.
    #[must_use]
    pub const fn new(client: reqwest::Client, config: ModelServerConfig) -> Self {
        Self { client, config }
    }

    fn ask_url(&self) -> String {
        format!("{}/ask", self.config.base_url.trim_end_matches('/'))
    }
}

/// Request body sent to the model server.
#[derive(Serialize)]
struct AskPayload<'a> {
    question: &'a str,
    mode: &'a str,
}

/// Typed reply from the model server.
#[derive(Deserialize)]
struct ModelServerReply {
    answer: Option<String>,
    reply: Option<String>,
    result: Option<String>,
}

impl ModelServerReply {
    /// Extract the first present, non-blank text field.
    fn into_text(self) -> Option<String> {
        [self.answer, self.reply, self.result]
            .into_iter()
            .flatten()
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
    }
}

#[async_trait]
impl AnswerSource for ModelServerSource {
    fn name(&self) -> &'static str {
        "model-server"
    }

    async fn resolve(&self, question: &str, mode: Mode) -> AnswerResult<String> {
        let response = self
            .client
            .post(self.ask_url())
            .json(&AskPayload {
                question,
                mode: mode.name(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnswerError::UpstreamStatus(status.as_u16()));
        }

        let reply: ModelServerReply = response.json().await?;
        reply.into_text().ok_or(AnswerError::EmptyAnswer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(answer: Option<&str>, fallback_reply: Option<&str>, result: Option<&str>) -> ModelServerReply {
        ModelServerReply {
            answer: answer.map(str::to_string),
            reply: fallback_reply.map(str::to_string),
            result: result.map(str::to_string),
        }
    }

    #[test]
    fn test_reply_prefers_answer_field() {
        let text = reply(Some("a"), Some("b"), Some("c")).into_text();
        assert_eq!(text, Some("a".to_string()));
    }

    #[test]
    fn test_reply_falls_through_blank_fields() {
        let text = reply(Some("   "), None, Some(" c ")).into_text();
        assert_eq!(text, Some("c".to_string()));
    }

    #[test]
    fn test_reply_with_no_text_is_none() {
        assert!(reply(None, None, None).into_text().is_none());
        assert!(reply(Some(""), Some("  "), None).into_text().is_none());
    }

    #[test]
    fn test_ask_url_strips_trailing_slash() {
        let source = ModelServerSource::new(
            reqwest::Client::new(),
            ModelServerConfig {
                base_url: "http://127.0.0.1:8001/".to_string(),
            },
        );
        assert_eq!(source.ask_url(), "http://127.0.0.1:8001/ask");
    }
}
