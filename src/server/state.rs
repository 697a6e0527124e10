//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::answer::AnswerService;
use crate::auth::IdentityResolver;
use crate::config::CuraConfig;
use crate::conversations::recorder::{ExchangeRecorder, DEFAULT_QUEUE_CAPACITY};
use crate::conversations::store::{ConversationStore, SqliteConversationStore};

/// Shared application state.
pub struct AppState {
    /// Bearer-credential resolver.
    pub resolver: IdentityResolver,
    /// Ordered answer source chain.
    pub answers: AnswerService,
    /// Conversation log used by the history read path.
    pub store: Arc<dyn ConversationStore>,
    /// Background writer for the conversation log.
    pub recorder: ExchangeRecorder,
}

impl AppState {
    /// Create the application state from validated configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, the HTTP client
    /// cannot be created, or the database cannot be opened.
    pub async fn new(
        config: CuraConfig,
    ) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        config.validate()?;

        let resolver = IdentityResolver::new(&config.auth);
        let answers = AnswerService::new(config.answer)?;
        let store: Arc<dyn ConversationStore> =
            Arc::new(SqliteConversationStore::new(&config.database_path).await?);
        let recorder = ExchangeRecorder::spawn(Arc::clone(&store), DEFAULT_QUEUE_CAPACITY);

        tracing::info!(
            sources = ?answers.source_names(),
            db = %config.database_path.display(),
            "answer chain configured"
        );

        Ok(Arc::new(Self {
            resolver,
            answers,
            store,
            recorder,
        }))
    }
}
