/*!
 * Error types for the transdoc application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when calling a translation engine API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error with authentication (missing or rejected credential)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Error related to rate limiting or quota exhaustion
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Model or endpoint not found, or not available in this region
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    /// Error establishing or maintaining a connection (network fault, timeout, 5xx)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine responded successfully but returned no content
    #[error("Engine returned an empty response")]
    EmptyResponse,

    /// The sanitized output was too short to be a plausible translation
    #[error("Insufficient content returned by the engine ({length} characters after sanitization)")]
    InsufficientContent {
        /// Character count of the sanitized output
        length: usize,
    },

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl ProviderError {
    /// Whether this error should abort all retries for the engine.
    ///
    /// Only authentication failures are fatal; every other kind may succeed
    /// on a later attempt or with a different model identifier.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProviderError::AuthenticationError(_))
    }
}

/// Terminal cause recorded for one engine after its retries were exhausted
#[derive(Debug, Clone)]
pub struct EngineFailure {
    /// Engine name
    pub engine: String,
    /// Human-readable terminal cause
    pub reason: String,
}

impl std::fmt::Display for EngineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.engine, self.reason)
    }
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The engine rejected the credential; never retried
    #[error("Engine '{engine}' authentication failed: {source}")]
    EngineAuthFailed {
        /// Engine name
        engine: String,
        /// Underlying provider error
        source: ProviderError,
    },

    /// A single engine exhausted its retry budget
    #[error("Engine '{engine}' exhausted after {attempts} attempts: {source}")]
    EngineExhausted {
        /// Engine name
        engine: String,
        /// Number of attempts made
        attempts: u32,
        /// Last underlying provider error
        source: ProviderError,
    },

    /// Every engine in the fallback chain failed for one piece of text
    #[error("All translation engines failed: {}", format_causes(.causes))]
    AllEnginesFailed {
        /// Terminal cause per attempted engine, in priority order
        causes: Vec<EngineFailure>,
    },

    /// A segment could not be translated, aborting the whole run
    #[error("Translation failed at segment {index}: {source}")]
    SegmentFailed {
        /// Zero-based index of the failing segment
        index: usize,
        /// The chain-level failure for that segment
        source: Box<TranslationError>,
    },

    /// The run was cancelled by the caller
    #[error("Translation cancelled")]
    Cancelled,
}

fn format_causes(causes: &[EngineFailure]) -> String {
    if causes.is_empty() {
        return "no engines were available".to_string();
    }
    causes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the application configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from an engine API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the translation pipeline
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
