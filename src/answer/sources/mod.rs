//! Answer source implementations.

pub mod fallback;
pub mod model_server;
pub mod openai;

use async_trait::async_trait;

use crate::answer::error::AnswerResult;
use crate::answer::types::Mode;

/// One upstream strategy capable of producing an answer text.
///
/// Any error (or empty text) from `resolve` is a decline: the chain logs
/// it and moves on to the next source.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Get the display name of the source, used in logs.
    fn name(&self) -> &'static str;

    /// Produce an answer for the question under the given persona mode.
    ///
    /// # Errors
    /// Returns an error when the source cannot produce usable text.
    async fn resolve(&self, question: &str, mode: Mode) -> AnswerResult<String>;
}
