/*!
 * Engine implementations for different translation services.
 *
 * This module contains client implementations for the translation backends:
 * - Groq: low-latency chat-completions API (primary engine)
 * - Gemini: Google generative language API (fallback engine)
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;

use log::warn;

use crate::errors::ProviderError;

/// Common trait for all translation engines
///
/// This trait defines the interface that all engine implementations must follow,
/// allowing them to be composed into a fallback chain and replaced by scripted
/// doubles in tests.
#[async_trait]
pub trait TranslationEngine: Send + Sync + Debug {
    /// Short engine name used in logs, progress reports and failure summaries
    fn name(&self) -> &str;

    /// Whether a usable credential is configured
    ///
    /// Engines without a credential are skipped by the fallback chain before
    /// any network call is made.
    fn is_configured(&self) -> bool;

    /// Translate `text` into `target_language`
    ///
    /// Implementations must use a finite request timeout and map backend
    /// failures onto the [`ProviderError`] taxonomy. An engine with several
    /// model identifiers tries them in order when one is unavailable before
    /// surfacing [`ProviderError::Unavailable`].
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;
}

/// Walk an engine's model ladder, advancing past unavailable models.
///
/// `attempt` is invoked once per model identifier, in ladder order. The first
/// outcome that is not [`ProviderError::Unavailable`] is returned as-is; only
/// when every model is unavailable does the last such error surface to the
/// caller.
pub async fn walk_model_ladder<'a, F, Fut>(
    engine: &str,
    models: &'a [String],
    mut attempt: F,
) -> Result<String, ProviderError>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<String, ProviderError>>,
{
    let mut last_unavailable = None;

    for model in models {
        match attempt(model).await {
            Err(ProviderError::Unavailable(message)) => {
                // Try the next model identifier before giving up
                warn!("{} model {} unavailable: {}", engine, model, message);
                last_unavailable = Some(ProviderError::Unavailable(message));
            }
            outcome => return outcome,
        }
    }

    Err(last_unavailable
        .unwrap_or_else(|| ProviderError::Unavailable("no models configured".to_string())))
}

/// Normalize a raw credential string.
///
/// Keys pasted from shell profiles frequently carry surrounding whitespace or
/// quotes; both break header-based authentication.
pub(crate) fn clean_credential(raw: &str) -> String {
    raw.trim().trim_matches(|c| c == '\'' || c == '"').to_string()
}

/// Map an HTTP error status to the provider error taxonomy
pub(crate) fn error_for_status(status_code: u16, message: String) -> ProviderError {
    match status_code {
        401 | 403 => ProviderError::AuthenticationError(message),
        429 => ProviderError::RateLimitExceeded(message),
        404 => ProviderError::Unavailable(message),
        500..=599 => ProviderError::ConnectionError(message),
        _ => ProviderError::ApiError {
            status_code,
            message,
        },
    }
}

/// System prompt shared by all engines.
///
/// Keeping the instruction identical across backends makes fallback output
/// interchangeable with primary output.
pub(crate) fn system_prompt(target_language: &str) -> String {
    format!(
        "You are an expert technical translator. \
         Task: Translate Markdown content to {}. \
         Constraints: \
         Preserve all Markdown structural elements (headers, tables, code blocks). \
         Return ONLY the translated Markdown, without any explanations or notes. \
         If the input is not Markdown, convert the output to high-fidelity Markdown.",
        target_language
    )
}

pub mod gemini;
pub mod groq;
