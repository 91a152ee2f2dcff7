/*!
 * Tests for the retry controller
 */

use std::sync::Arc;
use std::time::Duration;

use transdoc::errors::{ProviderError, TranslationError};
use transdoc::translation::cancel::CancelFlag;
use transdoc::translation::retry::{NoopObserver, RetryController, RetryPolicy};

use crate::common::mock_engines::{
    CancellingDelay, CollectingObserver, RecordingDelay, ScriptedEngine,
};

fn controller_with_delay(delay: Arc<RecordingDelay>) -> RetryController {
    RetryController::new(RetryPolicy::default(), delay)
}

#[tokio::test]
async fn test_translate_withTwoRateLimitsThenSuccess_shouldReturnThirdResult() {
    let engine = ScriptedEngine::new("mock");
    engine.push_err(ProviderError::RateLimitExceeded("quota".into()));
    engine.push_err(ProviderError::RateLimitExceeded("quota".into()));
    engine.push_ok("TRANSLATED CONTENT FROM THIRD ATTEMPT");

    let delay = Arc::new(RecordingDelay::new());
    let controller = controller_with_delay(delay.clone());

    let result = controller
        .translate(&engine, "source text", "Spanish", &NoopObserver, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(result, "TRANSLATED CONTENT FROM THIRD ATTEMPT");
    assert_eq!(engine.call_count(), 3);
    // Linear backoff: attempt 1 waits base, attempt 2 waits 2 * base
    assert_eq!(
        delay.recorded(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test]
async fn test_translate_withAuthError_shouldAbortWithoutRetrying() {
    let engine = ScriptedEngine::new("mock");
    engine.push_err(ProviderError::AuthenticationError("bad key".into()));

    let delay = Arc::new(RecordingDelay::new());
    let controller = controller_with_delay(delay.clone());

    let result = controller
        .translate(&engine, "source text", "Spanish", &NoopObserver, &CancelFlag::new())
        .await;

    assert!(matches!(
        result,
        Err(TranslationError::EngineAuthFailed { .. })
    ));
    assert_eq!(engine.call_count(), 1);
    assert!(delay.recorded().is_empty());
}

#[tokio::test]
async fn test_translate_withAllAttemptsFailing_shouldExhaustWithLastError() {
    let engine = ScriptedEngine::new("mock");
    engine.push_err(ProviderError::ConnectionError("timeout".into()));
    engine.push_err(ProviderError::RateLimitExceeded("quota".into()));
    engine.push_err(ProviderError::EmptyResponse);

    let delay = Arc::new(RecordingDelay::new());
    let controller = controller_with_delay(delay.clone());

    let result = controller
        .translate(&engine, "source text", "Spanish", &NoopObserver, &CancelFlag::new())
        .await;

    match result {
        Err(TranslationError::EngineExhausted {
            engine: name,
            attempts,
            source,
        }) => {
            assert_eq!(name, "mock");
            assert_eq!(attempts, 3);
            assert!(matches!(source, ProviderError::EmptyResponse));
        }
        other => panic!("expected EngineExhausted, got {:?}", other),
    }
    assert_eq!(engine.call_count(), 3);
    assert_eq!(delay.recorded().len(), 2);
}

#[tokio::test]
async fn test_translate_withInsufficientContent_shouldConsumeRetryAttempt() {
    let engine = ScriptedEngine::new("mock");
    // Too short to pass sanitization, then a real translation
    engine.push_ok("short");
    engine.push_ok("THIS IS A FULL TRANSLATION RESULT");

    let delay = Arc::new(RecordingDelay::new());
    let controller = controller_with_delay(delay.clone());

    let result = controller
        .translate(&engine, "source text", "Spanish", &NoopObserver, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(result, "THIS IS A FULL TRANSLATION RESULT");
    assert_eq!(engine.call_count(), 2);
    assert_eq!(delay.recorded(), vec![Duration::from_millis(1000)]);
}

#[tokio::test]
async fn test_translate_withFencedOutput_shouldReturnSanitizedPayload() {
    let engine = ScriptedEngine::new("mock");
    engine.push_ok("Here you go: ```markdown\n# Translated Heading\n\nBody.\n``` hope that helps!");

    let controller = controller_with_delay(Arc::new(RecordingDelay::new()));

    let result = controller
        .translate(&engine, "source text", "Spanish", &NoopObserver, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(result, "# Translated Heading\n\nBody.");
}

#[tokio::test]
async fn test_translate_withRetries_shouldNotifyObserverPerAttempt() {
    let engine = ScriptedEngine::new("mock");
    engine.push_err(ProviderError::RateLimitExceeded("quota".into()));
    engine.push_err(ProviderError::ConnectionError("reset".into()));
    engine.push_ok("FINAL TRANSLATED SEGMENT TEXT");

    let observer = CollectingObserver::new();
    let controller = controller_with_delay(Arc::new(RecordingDelay::new()));

    controller
        .translate(&engine, "source text", "Spanish", &observer, &CancelFlag::new())
        .await
        .unwrap();

    let attempts = observer.collected();
    assert_eq!(
        attempts,
        vec![
            ("mock".to_string(), 1, "retryable".to_string()),
            ("mock".to_string(), 2, "retryable".to_string()),
            ("mock".to_string(), 3, "success".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_translate_withCancellationDuringBackoff_shouldStopBeforeNextSleep() {
    let engine = ScriptedEngine::new("mock");
    for _ in 0..3 {
        engine.push_err(ProviderError::RateLimitExceeded("quota".into()));
    }

    let cancel = CancelFlag::new();
    let delay = Arc::new(CancellingDelay::new());
    delay.attach(cancel.clone());
    let controller = RetryController::new(RetryPolicy::default(), delay.clone());

    let result = controller
        .translate(&engine, "source text", "Spanish", &NoopObserver, &cancel)
        .await;

    assert!(matches!(result, Err(TranslationError::Cancelled)));
    // The flag was raised during the first backoff: the in-flight second
    // attempt still runs, but no further backoff is slept
    assert_eq!(engine.call_count(), 2);
    assert_eq!(delay.recorded(), vec![Duration::from_millis(1000)]);
}

#[tokio::test]
async fn test_translate_withCustomPolicy_shouldScaleBackoffFromBase() {
    let engine = ScriptedEngine::new("mock");
    engine.push_err(ProviderError::RateLimitExceeded("quota".into()));
    engine.push_ok("TRANSLATED ON SECOND ATTEMPT");

    let delay = Arc::new(RecordingDelay::new());
    let controller = RetryController::new(
        RetryPolicy {
            max_retries: 2,
            backoff_base_ms: 250,
        },
        delay.clone(),
    );

    controller
        .translate(&engine, "source text", "Spanish", &NoopObserver, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(delay.recorded(), vec![Duration::from_millis(250)]);
}
