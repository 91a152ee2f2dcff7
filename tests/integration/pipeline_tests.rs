/*!
 * End-to-end pipeline tests over scripted engines
 */

use std::sync::Arc;
use std::time::Duration;

use transdoc::errors::{ProviderError, TranslationError};
use transdoc::translation::fallback::{EngineSlot, FallbackOrchestrator};
use transdoc::translation::pipeline::{Document, ProgressSink, TranslationPipeline};

use crate::common::mock_engines::{
    CancellingDelay, CollectingSink, RecordingDelay, ScriptedEngine, DEFAULT_MOCK_OUTPUT,
};

/// Build a pipeline over the given engines with shared recording delay
fn pipeline_with(
    engines: Vec<(Arc<ScriptedEngine>, u32)>,
    segment_max_chars: usize,
    delay: Arc<RecordingDelay>,
) -> TranslationPipeline {
    let slots = engines
        .into_iter()
        .map(|(engine, priority)| EngineSlot::new(engine, priority))
        .collect();
    let orchestrator = FallbackOrchestrator::new(slots, delay.clone());
    TranslationPipeline::new(orchestrator, segment_max_chars, 500, delay)
}

#[tokio::test]
async fn test_run_withThreeSegments_shouldJoinTranslationsInOrder() {
    // 5000 characters, no line breaks: three segments of 2000/2000/1000
    let document = Document::new("Test Document", "a".repeat(5000));

    let engine = Arc::new(ScriptedEngine::new("primary"));
    engine.push_ok("TRANSLATED SEGMENT ONE");
    engine.push_ok("TRANSLATED SEGMENT TWO");
    engine.push_ok("TRANSLATED SEGMENT THREE");

    let delay = Arc::new(RecordingDelay::new());
    let pipeline = pipeline_with(vec![(engine.clone(), 0)], 2000, delay.clone());

    let result = pipeline.run(&document, "Spanish", None).await.unwrap();

    assert_eq!(
        result,
        "TRANSLATED SEGMENT ONE\n\nTRANSLATED SEGMENT TWO\n\nTRANSLATED SEGMENT THREE"
    );
    assert_eq!(engine.call_count(), 3);
    // Pacing between completed segments only, never after the last one
    assert_eq!(
        delay.recorded(),
        vec![Duration::from_millis(500), Duration::from_millis(500)]
    );
}

#[tokio::test]
async fn test_run_withEmptyDocument_shouldReturnEmptyOutput() {
    let document = Document::new("Empty", "   \n\n  ");
    let engine = Arc::new(ScriptedEngine::new("primary"));
    let delay = Arc::new(RecordingDelay::new());
    let pipeline = pipeline_with(vec![(engine.clone(), 0)], 2000, delay);

    let result = pipeline.run(&document, "Spanish", None).await.unwrap();

    assert_eq!(result, "");
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn test_run_withFailingSegment_shouldAbortWithSegmentIndex() {
    let document = Document::new("Test Document", "a".repeat(4500));

    // First segment succeeds, second exhausts both engines
    let primary = Arc::new(ScriptedEngine::new("primary"));
    primary.push_ok("FIRST SEGMENT TRANSLATED");
    for _ in 0..3 {
        primary.push_err(ProviderError::RateLimitExceeded("quota".into()));
    }
    let secondary = Arc::new(ScriptedEngine::new("secondary"));
    for _ in 0..3 {
        secondary.push_err(ProviderError::ConnectionError("down".into()));
    }

    let delay = Arc::new(RecordingDelay::new());
    let pipeline = pipeline_with(
        vec![(primary.clone(), 0), (secondary.clone(), 1)],
        2000,
        delay,
    );

    let result = pipeline.run(&document, "Spanish", None).await;

    match result {
        Err(TranslationError::SegmentFailed { index, source }) => {
            assert_eq!(index, 1);
            assert!(matches!(
                *source,
                TranslationError::AllEnginesFailed { .. }
            ));
        }
        other => panic!("expected SegmentFailed, got {:?}", other),
    }
    assert_eq!(primary.call_count(), 4);
    assert_eq!(secondary.call_count(), 3);
}

#[tokio::test]
async fn test_run_withPrimaryFailingOnce_shouldUseFallbackOutput() {
    let document = Document::new("Test Document", "short source document text");

    let primary = Arc::new(ScriptedEngine::new("primary"));
    for _ in 0..3 {
        primary.push_err(ProviderError::RateLimitExceeded("quota".into()));
    }
    let secondary = Arc::new(ScriptedEngine::new("secondary"));
    secondary.push_ok("FALLBACK ENGINE RESULT");

    let delay = Arc::new(RecordingDelay::new());
    let pipeline = pipeline_with(
        vec![(primary.clone(), 0), (secondary.clone(), 1)],
        2000,
        delay,
    );

    let result = pipeline.run(&document, "Spanish", None).await.unwrap();

    assert_eq!(result, "FALLBACK ENGINE RESULT");
    assert_eq!(primary.call_count(), 3);
    assert_eq!(secondary.call_count(), 1);
}

#[tokio::test]
async fn test_run_withProgressSink_shouldReportEveryAttempt() {
    let document = Document::new("Test Document", "a".repeat(3000));

    let engine = Arc::new(ScriptedEngine::new("primary"));
    // Segment 1: one retry then success; segment 2: immediate success
    engine.push_err(ProviderError::RateLimitExceeded("quota".into()));
    engine.push_ok("SEGMENT ONE TRANSLATED");
    engine.push_ok("SEGMENT TWO TRANSLATED");

    let delay = Arc::new(RecordingDelay::new());
    let pipeline = pipeline_with(vec![(engine, 0)], 2000, delay);

    let sink = Arc::new(CollectingSink::new());
    let sink_handle: Arc<dyn ProgressSink> = sink.clone();
    pipeline
        .run(&document, "Spanish", Some(sink_handle))
        .await
        .unwrap();

    let updates = sink.collected();
    assert_eq!(updates.len(), 3);

    assert_eq!(updates[0].current, 1);
    assert_eq!(updates[0].total, 2);
    assert_eq!(updates[0].attempt, 1);
    assert!(updates[0].status.contains("retrying"));

    assert_eq!(updates[1].current, 1);
    assert_eq!(updates[1].attempt, 2);
    assert!(updates[1].status.contains("translated"));

    assert_eq!(updates[2].current, 2);
    assert_eq!(updates[2].attempt, 1);
}

#[tokio::test]
async fn test_run_withCancellationBeforeStart_shouldNotCallAnyEngine() {
    let document = Document::new("Test Document", "a".repeat(3000));
    let engine = Arc::new(ScriptedEngine::new("primary"));

    let delay = Arc::new(RecordingDelay::new());
    let pipeline = pipeline_with(vec![(engine.clone(), 0)], 2000, delay);

    pipeline.cancel_flag().cancel();
    let result = pipeline.run(&document, "Spanish", None).await;

    assert!(matches!(result, Err(TranslationError::Cancelled)));
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn test_run_withCancellationDuringBackoff_shouldStopWithoutFinishingRetries() {
    let document = Document::new("Test Document", "a".repeat(100));

    let engine = Arc::new(ScriptedEngine::new("primary"));
    for _ in 0..3 {
        engine.push_err(ProviderError::RateLimitExceeded("quota".into()));
    }

    let delay = Arc::new(CancellingDelay::new());
    let orchestrator =
        FallbackOrchestrator::new(vec![EngineSlot::new(engine.clone(), 0)], delay.clone());
    let pipeline = TranslationPipeline::new(orchestrator, 2000, 500, delay.clone());
    delay.attach(pipeline.cancel_flag());

    let result = pipeline.run(&document, "Spanish", None).await;

    // Cancelled during the first backoff: the second attempt still runs,
    // then the run stops before any further sleep
    assert!(matches!(result, Err(TranslationError::Cancelled)));
    assert_eq!(engine.call_count(), 2);
    assert_eq!(delay.recorded(), vec![Duration::from_millis(1000)]);
}

#[tokio::test]
async fn test_run_withRetryBackoffAndPacing_shouldRecordBothDelayKinds() {
    let document = Document::new("Test Document", "a".repeat(3000));

    let engine = Arc::new(ScriptedEngine::new("primary"));
    engine.push_err(ProviderError::ConnectionError("timeout".into()));
    engine.push_ok("SEGMENT ONE TRANSLATED");
    engine.push_ok("SEGMENT TWO TRANSLATED");

    let delay = Arc::new(RecordingDelay::new());
    let pipeline = pipeline_with(vec![(engine, 0)], 2000, delay.clone());

    pipeline.run(&document, "Spanish", None).await.unwrap();

    // Backoff for the failed attempt, then pacing between the two segments
    assert_eq!(
        delay.recorded(),
        vec![Duration::from_millis(1000), Duration::from_millis(500)]
    );
}

#[tokio::test]
async fn test_run_withSegmentsOnLineBreaks_shouldTranslateEachSegmentOnce() {
    let content = format!(
        "{}\n{}\n{}",
        "first paragraph ".repeat(20),
        "second paragraph ".repeat(20),
        "third paragraph ".repeat(20)
    );
    let document = Document::new("Structured", content);

    let engine = Arc::new(ScriptedEngine::new("primary"));

    let delay = Arc::new(RecordingDelay::new());
    let pipeline = pipeline_with(vec![(engine.clone(), 0)], 400, delay);

    let result = pipeline.run(&document, "Spanish", None).await.unwrap();

    assert_eq!(engine.call_count(), 3);
    // Every segment used the default scripted output
    assert_eq!(result.matches(DEFAULT_MOCK_OUTPUT).count(), 3);
}
