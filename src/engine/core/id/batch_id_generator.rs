use super::batch_id::BatchId;
use super::event_id::EventId;
use super::event_id_generator::EventIdGenerator;
use crate::engine::errors::IdError;
use crate::shared::clock::Clock;
use crate::shared::config::GeneratorConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, warn};

/// How often and how long [`BatchIdGenerator::get_batch`] waits for the
/// clock when the current 10ms bucket is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(10),
        }
    }
}

impl From<&GeneratorConfig> for RetryPolicy {
    fn from(cfg: &GeneratorConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            delay: Duration::from_millis(cfg.retry_delay_ms),
        }
    }
}

/// Clock-driven allocator of batch ids, one per store.
///
/// Every allocation reads the clock and advances the last issued batch id
/// under a single lock, so no two callers ever observe the same
/// `(timestamp, sequence)` pair. The lock is released while waiting for a
/// full bucket to pass.
pub struct BatchIdGenerator {
    current: Mutex<Option<BatchId>>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
    warned: AtomicBool,
}

impl BatchIdGenerator {
    /// Continues numbering after `last_known` when given, otherwise starts
    /// from whatever the clock says on the first allocation.
    pub fn create(last_known: Option<EventId>, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(last_known, clock, RetryPolicy::default())
    }

    pub fn with_policy(
        last_known: Option<EventId>,
        clock: Arc<dyn Clock>,
        policy: RetryPolicy,
    ) -> Self {
        if let Some(id) = last_known {
            debug!(
                target: "batch_ledger::generator",
                last_event_id = id.raw(),
                batch = %id.batch_id(),
                "Seeding batch generator from stored event id"
            );
        }
        Self {
            current: Mutex::new(last_known.map(|id| id.batch_id())),
            clock,
            policy,
            warned: AtomicBool::new(false),
        }
    }

    /// Most recently issued batch id.
    pub fn current(&self) -> Option<BatchId> {
        *self.current.lock()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Allocates the next batch id and returns a generator for its events.
    pub async fn get_batch(&self) -> Result<EventIdGenerator, IdError> {
        // Zero attempts still allocates once.
        let max_attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            if let Some(batch) = self.try_allocate()? {
                return EventIdGenerator::new(batch);
            }
            if attempt == max_attempts {
                break;
            }
            if !self.warned.swap(true, Ordering::Relaxed) {
                warn!(
                    target: "batch_ledger::generator",
                    attempt,
                    delay_ms = self.policy.delay.as_millis() as u64,
                    "Batch bucket is full; waiting for the clock to advance"
                );
            }
            tokio::time::sleep(self.policy.delay).await;
        }

        error!(
            target: "batch_ledger::generator",
            attempts = max_attempts,
            "Batch generator exhausted; clock is not advancing"
        );
        Err(IdError::BatchSequenceExhausted {
            attempts: max_attempts,
        })
    }

    fn try_allocate(&self) -> Result<Option<BatchId>, IdError> {
        let mut current = self.current.lock();
        let now = self.clock.now();

        let next = match *current {
            None => Some(BatchId::new(now)?),
            Some(last) => last.try_advance(now).inspect_err(|e| {
                error!(target: "batch_ledger::generator", error = %e, "Refusing to allocate batch");
            })?,
        };

        if let Some(batch) = next {
            *current = Some(batch);
        }
        Ok(next)
    }
}
