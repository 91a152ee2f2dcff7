/*!
 * Engine output sanitization and validation.
 *
 * Engines occasionally wrap the translated Markdown in a fenced code block,
 * sometimes with a language tag, and add conversational filler around it.
 * The sanitizer extracts the fenced interior when present and rejects output
 * too short to be a plausible translation, so corrupt or empty results never
 * reach the accumulator.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ProviderError;

/// Minimum number of characters a sanitized result must contain
pub const MIN_CONTENT_CHARS: usize = 10;

static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```(?:markdown|md)?\s*(.*?)\s*```").expect("fence regex is valid")
});

/// Extract the translated payload from raw engine output.
///
/// When the output contains a fenced block the interior is returned;
/// otherwise the raw output is used as-is. The result is trimmed.
pub fn extract_payload(raw: &str) -> &str {
    FENCE_RE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|matched| matched.as_str())
        .unwrap_or(raw)
        .trim()
}

/// Sanitize raw engine output into accepted translated text.
///
/// Fails with [`ProviderError::InsufficientContent`] when the extracted
/// payload is shorter than [`MIN_CONTENT_CHARS`] characters; the retry
/// controller treats that as a retryable attempt failure.
pub fn sanitize(raw: &str) -> Result<String, ProviderError> {
    let cleaned = extract_payload(raw);
    let length = cleaned.chars().count();

    if length < MIN_CONTENT_CHARS {
        return Err(ProviderError::InsufficientContent { length });
    }

    Ok(cleaned.to_string())
}
