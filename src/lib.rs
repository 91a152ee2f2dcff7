/*!
 * # transdoc - resilient document translation pipeline
 *
 * A Rust library for translating long documents through AI providers.
 *
 * ## Features
 *
 * - Split long documents into bounded segments at line-break boundaries
 * - Translate each segment through a priority-ordered engine chain:
 *   - Groq (low-latency primary)
 *   - Gemini (high-availability fallback)
 * - Bounded per-engine retries with linear backoff
 * - Output sanitization and minimum-content validation
 * - Deterministic in-order reassembly with fail-fast semantics
 * - Request pacing, progress reporting and cooperative cancellation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmenter`: Bounded document segmentation
 * - `translation`: The resilient translation pipeline:
 *   - `translation::retry`: Bounded retry with linear backoff
 *   - `translation::fallback`: Multi-engine orchestration
 *   - `translation::sanitize`: Output sanitization and validation
 *   - `translation::pipeline`: Sequential segment driver
 * - `file_utils`: File system operations
 * - `providers`: Client implementations for the translation engines:
 *   - `providers::groq`: Groq API client
 *   - `providers::gemini`: Gemini API client
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod segmenter;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, TranslationError};
pub use providers::TranslationEngine;
pub use translation::{
    Document, EngineSlot, FallbackOrchestrator, RetryPolicy, TranslationPipeline,
};
