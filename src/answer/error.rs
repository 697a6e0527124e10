//! Error types for the answer resolution module.

use thiserror::Error;

/// Errors produced while asking an upstream answer source.
///
/// Inside the chain every variant is treated as a decline: it is logged
/// and the next source is tried. None of these values ever reaches an
/// HTTP response.
#[derive(Debug, Error)]
pub enum AnswerError {
    /// HTTP request failed (transport, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    /// Upstream rejected the configured API key.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Upstream asked us to back off.
    #[error("rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    /// Upstream body parsed but carried no usable text.
    #[error("upstream response had no usable answer text")]
    EmptyAnswer,

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result alias for answer operations.
pub type AnswerResult<T> = Result<T, AnswerError>;
