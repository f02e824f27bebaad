use super::fixtures::{Account, Deposited, Order, Withdrawn};
use crate::engine::core::id::RetryPolicy;
use crate::engine::facade::MemoryDocumentStore;
use crate::engine::store::{EventStore, StoreSettings};
use crate::shared::clock::{Clock, SystemClock};
use std::sync::Arc;

/// Builds an [`EventStore`] over an in-memory facade with the ledger
/// fixtures registered (`Closed` stays unregistered).
pub struct StoreFactory {
    facade: MemoryDocumentStore,
    clock: Arc<dyn Clock>,
    retry_policy: Option<RetryPolicy>,
    register_order: bool,
}

impl StoreFactory {
    pub fn new() -> Self {
        Self {
            facade: MemoryDocumentStore::new(),
            clock: Arc::new(SystemClock),
            retry_policy: None,
            register_order: true,
        }
    }

    /// Reuses existing data, as after a restart.
    pub fn with_facade(mut self, facade: MemoryDocumentStore) -> Self {
        self.facade = facade;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn without_order_stream(mut self) -> Self {
        self.register_order = false;
        self
    }

    pub fn settings(&self) -> StoreSettings {
        let mut settings = StoreSettings::new()
            .register_stream::<Account>()
            .register_event::<Deposited>("Deposited")
            .register_event::<Withdrawn>("Withdrawn");
        if self.register_order {
            settings = settings.register_stream::<Order>();
        }
        if let Some(policy) = self.retry_policy {
            settings = settings.with_retry_policy(policy);
        }
        settings
    }

    pub fn create(self) -> EventStore<MemoryDocumentStore> {
        let settings = self.settings();
        EventStore::with_clock(self.facade, settings, self.clock)
    }

    /// Like [`create`](Self::create) but with collections in place.
    pub async fn create_upgraded(self) -> EventStore<MemoryDocumentStore> {
        let store = self.create();
        store.upgrade().await.unwrap();
        store
    }
}
