/*!
 * The resilient chunked-translation pipeline.
 *
 * This module contains the core translation machinery:
 * - `cancel`: cooperative cancellation flag shared across the suspension points
 * - `delay`: schedulable-delay seam so tests can run without wall-clock waits
 * - `sanitize`: payload extraction and minimum-content validation
 * - `retry`: bounded linear-backoff retry around one engine
 * - `fallback`: priority-ordered multi-engine orchestration
 * - `pipeline`: the sequential segment-by-segment driver
 */

pub mod cancel;
pub mod delay;
pub mod fallback;
pub mod pipeline;
pub mod retry;
pub mod sanitize;

pub use cancel::CancelFlag;
pub use delay::{Delay, TokioDelay};
pub use fallback::{EngineSlot, FallbackOrchestrator};
pub use pipeline::{Document, ProgressSink, ProgressUpdate, TranslationPipeline};
pub use retry::{AttemptObserver, AttemptOutcome, NoopObserver, RetryController, RetryPolicy};
