//! Configuration for the answer resolution module.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::answer::error::{AnswerError, AnswerResult};

/// Default chat-completion endpoint base.
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default chat-completion model.
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for the answer source chain.
///
/// Sources are only instantiated when their section is present; an empty
/// config leaves the deterministic local fallback as the sole answerer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Request timeout for upstream calls.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout for upstream calls.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// Remote model server settings, if deployed.
    pub model_server: Option<ModelServerConfig>,
    /// Hosted chat-completion provider settings, if an API key is configured.
    pub openai: Option<OpenAiConfig>,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(8),
            connect_timeout: Duration::from_secs(3),
            model_server: None,
            openai: None,
        }
    }
}

impl AnswerConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable the remote model server source.
    #[must_use]
    pub fn with_model_server(mut self, base_url: impl Into<String>) -> Self {
        self.model_server = Some(ModelServerConfig {
            base_url: base_url.into(),
        });
        self
    }

    /// Enable the hosted chat-completion source with an API key.
    #[must_use]
    pub fn with_openai_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.openai = Some(OpenAiConfig {
            api_key: api_key.into(),
            ..OpenAiConfig::default()
        });
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if a configured base URL does not parse or a
    /// required key is blank.
    pub fn validate(&self) -> AnswerResult<()> {
        if let Some(model_server) = &self.model_server {
            Url::parse(&model_server.base_url)?;
        }

        if let Some(openai) = &self.openai {
            Url::parse(&openai.base_url)?;
            if openai.api_key.trim().is_empty() {
                return Err(AnswerError::Config(
                    "openai.api_key must not be blank".to_string(),
                ));
            }
            if openai.model.trim().is_empty() {
                return Err(AnswerError::Config(
                    "openai.model must not be blank".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Remote model server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelServerConfig {
    /// Base URL of the model server; the source posts to `{base}/ask`.
    pub base_url: String,
}

/// Hosted chat-completion provider settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Bearer API key.
    pub api_key: String,
    /// API base URL; the source posts to `{base}/chat/completions`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENAI_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
