use super::fixtures::LedgerEvent;
use crate::engine::core::event::{
    EventBatch, EventMetadata, StreamId, StreamLocator, StreamType,
};
use chrono::Utc;

/// Builds batches of ledger events for one stream.
pub struct EventBatchFactory<T> {
    locator: StreamLocator<T>,
    events: Vec<LedgerEvent>,
    with_metadata: bool,
}

impl<T: StreamType> EventBatchFactory<T> {
    pub fn new() -> Self {
        Self {
            locator: StreamLocator::new(StreamId::new()),
            events: Vec::new(),
            with_metadata: false,
        }
    }

    pub fn for_stream(mut self, locator: StreamLocator<T>) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_event(mut self, event: LedgerEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Appends one deposit per amount.
    pub fn with_deposits(mut self, amounts: &[u64]) -> Self {
        self.events
            .extend(amounts.iter().map(|&amount| LedgerEvent::deposit(amount)));
        self
    }

    pub fn with_metadata(mut self) -> Self {
        self.with_metadata = true;
        self
    }

    pub fn create(self) -> EventBatch<T, LedgerEvent> {
        let mut batch = EventBatch::new(self.locator);
        for event in self.events {
            let metadata = self.with_metadata.then(|| EventMetadata::new(Utc::now()));
            batch.push(event, metadata);
        }
        batch
    }
}
