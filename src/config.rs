//! Process configuration for the Cura agent.
//!
//! The environment is read exactly once here; every component receives
//! its configuration by value at construction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::answer::config::{AnswerConfig, ModelServerConfig, OpenAiConfig};
use crate::auth::AuthConfig;

/// Environment variable for the listen port.
const PORT_ENV: &str = "CURA_PORT";
/// Environment variable for the SQLite database path.
const DB_PATH_ENV: &str = "CURA_DB_PATH";
/// Environment variable for the token verification secret.
const JWT_SECRET_ENV: &str = "CURA_JWT_SECRET";
/// Environment variable for the remote model server base URL.
const MODEL_SERVER_ENV: &str = "CURA_MODEL_SERVER_URL";
/// Environment variable for the hosted chat-completion API key.
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the chat-completion base URL.
const OPENAI_URL_ENV: &str = "CURA_OPENAI_URL";
/// Environment variable overriding the chat-completion model.
const OPENAI_MODEL_ENV: &str = "CURA_OPENAI_MODEL";

/// Default listen port.
const DEFAULT_PORT: u16 = 5000;
/// Default SQLite database path.
const DEFAULT_DB_PATH: &str = "cura.db";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    /// A value is present but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for the Cura agent process.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CuraConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Path of the conversation database.
    pub database_path: PathBuf,
    /// Credential verification settings.
    #[serde(skip)]
    pub auth: AuthConfig,
    /// Answer source chain settings.
    pub answer: AnswerConfig,
}

impl Default for CuraConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            auth: AuthConfig::default(),
            answer: AnswerConfig::default(),
        }
    }
}

impl CuraConfig {
    /// Load configuration from the environment.
    ///
    /// Upstream answer sources are optional: leaving their variables
    /// unset disables the source and the deterministic fallback keeps the
    /// service total. The token secret is required.
    ///
    /// # Errors
    /// Returns an error if the secret is missing or a value is unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var(PORT_ENV) {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|err| ConfigError::Invalid(format!("{PORT_ENV}: {err}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let database_path = std::env::var(DB_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from);

        let secret =
            std::env::var(JWT_SECRET_ENV).map_err(|_| ConfigError::MissingVar(JWT_SECRET_ENV))?;

        let mut answer = AnswerConfig::default();
        if let Ok(base_url) = std::env::var(MODEL_SERVER_ENV) {
            answer.model_server = Some(ModelServerConfig { base_url });
        }
        if let Ok(api_key) = std::env::var(OPENAI_KEY_ENV) {
            let mut openai = OpenAiConfig {
                api_key,
                ..OpenAiConfig::default()
            };
            if let Ok(base_url) = std::env::var(OPENAI_URL_ENV) {
                openai.base_url = base_url;
            }
            if let Ok(model) = std::env::var(OPENAI_MODEL_ENV) {
                openai.model = model;
            }
            answer.openai = Some(openai);
        }

        let config = Self {
            port,
            database_path,
            auth: AuthConfig { secret },
            answer,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if the secret is blank or an answer source is
    /// misconfigured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{JWT_SECRET_ENV} must not be blank"
            )));
        }

        self.answer
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        Ok(())
    }
}
