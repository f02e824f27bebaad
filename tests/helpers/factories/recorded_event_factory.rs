use super::fixtures::LedgerEvent;
use crate::engine::core::event::{EventMetadata, RecordedEvent, StreamId};
use crate::engine::core::id::{BatchId, EPOCH_ZERO_SECS, EventId, EventIdGenerator};
use chrono::DateTime;
use rand::Rng;

/// Builds recorded events without going through a store.
pub struct RecordedEventFactory {
    batch: Option<BatchId>,
    stream_id: StreamId,
    event: Option<LedgerEvent>,
    metadata: Option<EventMetadata>,
}

impl RecordedEventFactory {
    pub fn new() -> Self {
        Self {
            batch: None,
            stream_id: StreamId::new(),
            event: None,
            metadata: None,
        }
    }

    pub fn with_batch(mut self, batch: BatchId) -> Self {
        self.batch = Some(batch);
        self
    }

    pub fn with_stream(mut self, stream_id: StreamId) -> Self {
        self.stream_id = stream_id;
        self
    }

    pub fn with_event(mut self, event: LedgerEvent) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Batch id at `secs` seconds and `millis` after the id epoch.
    pub fn batch_at(secs: i64, millis: u32) -> BatchId {
        let at = DateTime::from_timestamp(EPOCH_ZERO_SECS + secs, millis * 1_000_000).unwrap();
        BatchId::new(at).unwrap()
    }

    pub fn create(self) -> RecordedEvent<LedgerEvent> {
        self.create_list(1).remove(0)
    }

    /// `count` consecutive events of one batch.
    pub fn create_list(self, count: usize) -> Vec<RecordedEvent<LedgerEvent>> {
        let mut rng = rand::thread_rng();
        let batch = self
            .batch
            .unwrap_or_else(|| Self::batch_at(rng.gen_range(1..1_000_000), 0));
        let mut ids = EventIdGenerator::new(batch).unwrap();

        (0..count)
            .map(|_| {
                let id: EventId = ids.next_id().unwrap();
                let event = self
                    .event
                    .clone()
                    .unwrap_or_else(|| LedgerEvent::deposit(rng.gen_range(1..10_000)));
                RecordedEvent::new(id, self.stream_id, event, self.metadata.clone())
            })
            .collect()
    }
}
