//! Answer resolution for the Cura agent.
//!
//! This module implements the ordered fallback chain over heterogeneous
//! answer sources:
//! - Remote model server (self-hosted backend)
//! - Hosted chat-completion provider
//! - Deterministic local fallback (terminal, never declines)
//!
//! Sources are tried strictly in priority order; any upstream failure is a
//! decline that advances the chain, so resolution always terminates with
//! an answer.

pub mod config;
pub mod error;
pub mod sources;
pub mod types;

pub use config::AnswerConfig;
pub use error::AnswerError;
pub use types::Mode;

use sources::fallback;
use sources::model_server::ModelServerSource;
use sources::openai::OpenAiSource;
use sources::AnswerSource;

/// Answer service coordinating the ordered source chain.
pub struct AnswerService {
    sources: Vec<Box<dyn AnswerSource>>,
}

impl AnswerService {
    /// Create a new answer service with the given configuration.
    ///
    /// Builds one shared HTTP client and instantiates the configured
    /// upstream sources in priority order.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AnswerConfig) -> Result<Self, AnswerError> {
        let client = Self::build_client(&config)?;

        let mut sources: Vec<Box<dyn AnswerSource>> = Vec::new();
        if let Some(model_server) = config.model_server {
            sources.push(Box::new(ModelServerSource::new(
                client.clone(),
                model_server,
            )));
        }
        if let Some(openai) = config.openai {
            sources.push(Box::new(OpenAiSource::new(client, openai)));
        }

        Ok(Self { sources })
    }

    /// Create an answer service with default configuration (fallback only).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, AnswerError> {
        Self::new(AnswerConfig::default())
    }

    /// Build the shared HTTP client with bounded timeouts.
    fn build_client(config: &AnswerConfig) -> Result<reqwest::Client, AnswerError> {
        reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AnswerError::HttpClient(e.to_string()))
    }

    /// Names of the configured upstream sources, in priority order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Resolve an answer for the question under the given persona mode.
    ///
    /// Tries each configured source in order; a transport failure, bad
    /// status, unparseable body, or blank text is logged as a decline and
    /// the next source is tried. The deterministic local fallback closes
    /// the chain, so this never fails and never returns empty text.
    pub async fn resolve(&self, question: &str, mode: Mode) -> String {
        for source in &self.sources {
            match source.resolve(question, mode).await {
                Ok(text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        tracing::warn!(source = source.name(), "answer source returned blank text");
                        continue;
                    }
                    tracing::debug!(source = source.name(), "answer resolved");
                    return text.to_string();
                }
                Err(err) => {
                    tracing::warn!(source = source.name(), %err, "answer source declined");
                }
            }
        }

        tracing::debug!(mode = mode.name(), "serving local fallback answer");
        fallback::answer(question, mode)
    }
}
