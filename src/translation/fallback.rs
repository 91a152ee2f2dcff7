/*!
 * Multi-engine fallback orchestration.
 *
 * Composes several translation engines in priority order, each governed by
 * its own retry controller. The highest-priority engine that works at all
 * wins; only when every engine in the chain is exhausted does the failure
 * surface, carrying the terminal cause from each attempted engine.
 */

use std::sync::Arc;

use log::{debug, warn};

use crate::errors::{EngineFailure, TranslationError};
use crate::providers::TranslationEngine;
use crate::translation::cancel::CancelFlag;
use crate::translation::delay::Delay;
use crate::translation::retry::{AttemptObserver, RetryController, RetryPolicy};

/// One engine in the fallback chain, with its position and retry budget
pub struct EngineSlot {
    /// The engine instance
    pub engine: Arc<dyn TranslationEngine>,
    /// Chain position; lower values are tried first
    pub priority: u32,
    /// Retry budget for this engine
    pub policy: RetryPolicy,
}

impl EngineSlot {
    /// Create a slot with the default retry policy
    pub fn new(engine: Arc<dyn TranslationEngine>, priority: u32) -> Self {
        Self {
            engine,
            priority,
            policy: RetryPolicy::default(),
        }
    }

    /// Create a slot with an explicit retry policy
    pub fn with_policy(
        engine: Arc<dyn TranslationEngine>,
        priority: u32,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            engine,
            priority,
            policy,
        }
    }
}

/// Orchestrator that walks the engine chain in priority order
pub struct FallbackOrchestrator {
    slots: Vec<EngineSlot>,
    delay: Arc<dyn Delay>,
}

impl FallbackOrchestrator {
    /// Create a new orchestrator from a statically configured engine chain.
    ///
    /// Slots are sorted by ascending priority at construction; the order is
    /// fixed for the lifetime of a run.
    pub fn new(mut slots: Vec<EngineSlot>, delay: Arc<dyn Delay>) -> Self {
        slots.sort_by_key(|slot| slot.priority);
        Self { slots, delay }
    }

    /// Engine names in the order they will be tried
    pub fn engine_names(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.engine.name()).collect()
    }

    /// Translate `text`, falling back through the chain until one engine succeeds.
    ///
    /// Engines without a configured credential are skipped before any network
    /// call and recorded in the failure summary with zero attempts. A
    /// cancellation surfaced by a retry controller aborts the walk at once
    /// instead of being recorded as an engine failure.
    pub async fn translate(
        &self,
        text: &str,
        target_language: &str,
        observer: &dyn AttemptObserver,
        cancel: &CancelFlag,
    ) -> Result<String, TranslationError> {
        let mut causes: Vec<EngineFailure> = Vec::new();

        for slot in &self.slots {
            if !slot.engine.is_configured() {
                debug!(
                    "Skipping engine '{}': no credential configured",
                    slot.engine.name()
                );
                causes.push(EngineFailure {
                    engine: slot.engine.name().to_string(),
                    reason: "no credential configured".to_string(),
                });
                continue;
            }

            let controller = RetryController::new(slot.policy.clone(), self.delay.clone());
            match controller
                .translate(slot.engine.as_ref(), text, target_language, observer, cancel)
                .await
            {
                Ok(translated) => return Ok(translated),
                Err(TranslationError::Cancelled) => return Err(TranslationError::Cancelled),
                Err(error) => {
                    warn!("Engine '{}' gave up: {}", slot.engine.name(), error);
                    causes.push(EngineFailure {
                        engine: slot.engine.name().to_string(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        Err(TranslationError::AllEnginesFailed { causes })
    }
}
