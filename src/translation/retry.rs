/*!
 * Bounded retry with linear backoff around a single engine.
 *
 * The controller owns the retry budget for one engine call: retryable
 * failures are retried with a backoff that grows linearly with the attempt
 * number, authentication failures abort immediately, and exhausting the
 * budget surfaces the last underlying error to the fallback chain.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::errors::TranslationError;
use crate::providers::TranslationEngine;
use crate::translation::cancel::CancelFlag;
use crate::translation::delay::Delay;
use crate::translation::sanitize;

/// Retry budget for one engine
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_retries: u32,
    /// Base backoff in milliseconds; attempt `n` waits `n * base`
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }
}

/// Outcome of a single engine attempt
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// The attempt produced accepted translated text
    Success,
    /// The attempt failed but may be retried
    Retryable(String),
    /// The attempt failed fatally; the engine is abandoned for this run
    Fatal(String),
}

/// Observer notified after every attempt
///
/// Purely advisory; implementations must not block for long and cannot
/// influence control flow.
pub trait AttemptObserver: Send + Sync {
    /// Called after each attempt, successful or not
    fn on_attempt(&self, engine: &str, attempt: u32, outcome: &AttemptOutcome);
}

/// Observer that ignores all attempts
pub struct NoopObserver;

impl AttemptObserver for NoopObserver {
    fn on_attempt(&self, _engine: &str, _attempt: u32, _outcome: &AttemptOutcome) {}
}

/// Retry controller wrapping one engine call with a bounded backoff policy
pub struct RetryController {
    policy: RetryPolicy,
    delay: Arc<dyn Delay>,
}

impl RetryController {
    /// Create a new controller with the given policy and delay implementation
    pub fn new(policy: RetryPolicy, delay: Arc<dyn Delay>) -> Self {
        Self { policy, delay }
    }

    /// Translate `text` through `engine`, retrying within the policy budget.
    ///
    /// Successful raw output is sanitized before being accepted; a sanitizer
    /// rejection consumes the attempt like any other retryable failure. The
    /// cancellation flag is checked before every backoff sleep, so a cancelled
    /// run never sits out the remaining budget.
    pub async fn translate(
        &self,
        engine: &dyn TranslationEngine,
        text: &str,
        target_language: &str,
        observer: &dyn AttemptObserver,
        cancel: &CancelFlag,
    ) -> Result<String, TranslationError> {
        let mut attempt: u32 = 1;

        loop {
            debug!(
                "Engine '{}' attempt {}/{}",
                engine.name(),
                attempt,
                self.policy.max_retries
            );

            let result = engine
                .translate(text, target_language)
                .await
                .and_then(|raw| sanitize::sanitize(&raw));

            match result {
                Ok(clean) => {
                    observer.on_attempt(engine.name(), attempt, &AttemptOutcome::Success);
                    return Ok(clean);
                }
                Err(error) if error.is_fatal() => {
                    observer.on_attempt(
                        engine.name(),
                        attempt,
                        &AttemptOutcome::Fatal(error.to_string()),
                    );
                    return Err(TranslationError::EngineAuthFailed {
                        engine: engine.name().to_string(),
                        source: error,
                    });
                }
                Err(error) => {
                    observer.on_attempt(
                        engine.name(),
                        attempt,
                        &AttemptOutcome::Retryable(error.to_string()),
                    );

                    if attempt >= self.policy.max_retries {
                        return Err(TranslationError::EngineExhausted {
                            engine: engine.name().to_string(),
                            attempts: attempt,
                            source: error,
                        });
                    }

                    if cancel.is_cancelled() {
                        debug!(
                            "Cancellation observed before backoff on engine '{}'",
                            engine.name()
                        );
                        return Err(TranslationError::Cancelled);
                    }

                    let backoff =
                        Duration::from_millis(self.policy.backoff_base_ms * u64::from(attempt));
                    warn!(
                        "Engine '{}' attempt {} failed ({}), retrying in {:?}",
                        engine.name(),
                        attempt,
                        error,
                        backoff
                    );
                    self.delay.sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
