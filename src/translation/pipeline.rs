/*!
 * The sequential translation pipeline driver.
 *
 * Iterates segments strictly in index order, runs each one through the
 * fallback chain, paces requests between segments, reports progress, and
 * reassembles the translated document. The run is all-or-nothing: the first
 * segment that exhausts every engine aborts the run and discards all
 * accumulated output.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use crate::errors::TranslationError;
use crate::segmenter;
use crate::translation::cancel::CancelFlag;
use crate::translation::delay::Delay;
use crate::translation::fallback::FallbackOrchestrator;
use crate::translation::retry::{AttemptObserver, AttemptOutcome};

/// Default inter-segment pacing delay in milliseconds
pub const DEFAULT_PACING_MS: u64 = 500;

/// Immutable input document handed to the pipeline
#[derive(Debug, Clone)]
pub struct Document {
    /// Document title, carried through to the export collaborator
    pub title: String,
    /// Optional author metadata
    pub author: Option<String>,
    /// Raw document body
    pub content: String,
}

impl Document {
    /// Create a document without author metadata
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
            content: content.into(),
        }
    }
}

/// One progress report, pushed after every engine attempt
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Current segment, 1-based
    pub current: usize,
    /// Total number of segments
    pub total: usize,
    /// Human-readable status line
    pub status: String,
    /// Attempt number within the current engine
    pub attempt: u32,
}

/// Observer for pipeline progress
///
/// Advisory only: a missing or slow sink cannot affect pipeline correctness,
/// and implementations must not block for more than a short bounded time.
pub trait ProgressSink: Send + Sync {
    /// Receive one progress update
    fn update(&self, update: ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn update(&self, update: ProgressUpdate) {
        self(update)
    }
}

/// The sequential segment-by-segment translation driver
pub struct TranslationPipeline {
    orchestrator: FallbackOrchestrator,
    segment_max_chars: usize,
    pacing_ms: u64,
    delay: Arc<dyn Delay>,
    cancel: CancelFlag,
}

impl TranslationPipeline {
    /// Create a new pipeline over a configured fallback chain
    pub fn new(
        orchestrator: FallbackOrchestrator,
        segment_max_chars: usize,
        pacing_ms: u64,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self {
            orchestrator,
            segment_max_chars,
            pacing_ms,
            delay,
            cancel: CancelFlag::new(),
        }
    }

    /// Handle callers can use to cancel the run from another task
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Translate a whole document into `target_language`.
    ///
    /// Segments are processed strictly in index order, one at a time; between
    /// successfully completed segments a fixed pacing delay keeps the request
    /// rate under steady-state engine limits, independent of retry backoff.
    ///
    /// On success the translated segments are joined with a blank line in
    /// original order. On the first segment that exhausts the whole chain the
    /// run aborts, prior translations are discarded, and the error carries the
    /// failing segment index together with the per-engine causes.
    pub async fn run(
        &self,
        document: &Document,
        target_language: &str,
        progress: Option<Arc<dyn ProgressSink>>,
    ) -> Result<String, TranslationError> {
        info!(
            "Segmenting '{}' ({} characters, max {} per segment)",
            document.title,
            document.content.chars().count(),
            self.segment_max_chars
        );
        let segments = segmenter::segment(&document.content, self.segment_max_chars);
        let total = segments.len();

        if total == 0 {
            info!("Document '{}' contains no translatable text", document.title);
            return Ok(String::new());
        }

        info!(
            "Translating {} segments through engines: {}",
            total,
            self.orchestrator.engine_names().join(" -> ")
        );

        let mut translated: Vec<String> = Vec::with_capacity(total);

        for (index, text) in segments.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Cancellation observed before segment {}", index + 1);
                return Err(TranslationError::Cancelled);
            }

            info!("Translating segment {}/{}", index + 1, total);
            let observer = SegmentProgress {
                current: index + 1,
                total,
                sink: progress.as_deref(),
            };

            match self
                .orchestrator
                .translate(text, target_language, &observer, &self.cancel)
                .await
            {
                Ok(result) => translated.push(result),
                Err(TranslationError::Cancelled) => {
                    info!("Cancellation observed during segment {}", index + 1);
                    return Err(TranslationError::Cancelled);
                }
                Err(cause) => {
                    error!("Segment {}/{} failed: {}", index + 1, total, cause);
                    return Err(TranslationError::SegmentFailed {
                        index,
                        source: Box::new(cause),
                    });
                }
            }

            // Pace between completed segments, not after the last one
            if index + 1 < total {
                if self.cancel.is_cancelled() {
                    info!("Cancellation observed after segment {}", index + 1);
                    return Err(TranslationError::Cancelled);
                }
                self.delay
                    .sleep(Duration::from_millis(self.pacing_ms))
                    .await;
            }
        }

        info!("Assembling {} translated segments", total);
        Ok(translated.join("\n\n").trim().to_string())
    }
}

/// Adapter that turns per-attempt callbacks into progress updates for one segment
struct SegmentProgress<'a> {
    current: usize,
    total: usize,
    sink: Option<&'a dyn ProgressSink>,
}

impl AttemptObserver for SegmentProgress<'_> {
    fn on_attempt(&self, engine: &str, attempt: u32, outcome: &AttemptOutcome) {
        let Some(sink) = self.sink else {
            return;
        };

        let status = match outcome {
            AttemptOutcome::Success => format!("{}: translated", engine),
            AttemptOutcome::Retryable(reason) => format!("{}: retrying ({})", engine, reason),
            AttemptOutcome::Fatal(reason) => format!("{}: failed ({})", engine, reason),
        };

        sink.update(ProgressUpdate {
            current: self.current,
            total: self.total,
            status,
            attempt,
        });
    }
}
