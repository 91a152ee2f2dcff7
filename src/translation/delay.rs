/*!
 * Schedulable delay abstraction.
 *
 * Backoff and pacing sleeps go through this trait so tests can substitute a
 * recording or zero-delay implementation instead of waiting on the wall clock.
 */

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

/// A suspension point the pipeline can wait on
#[async_trait]
pub trait Delay: Send + Sync + Debug {
    /// Sleep for the given duration
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock delay backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
