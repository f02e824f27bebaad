use super::criteria::{Criteria, CriteriaBuilder};
use super::documents::{STREAM_ID_FIELD, decode_event_key};
use super::settings::StoreSettings;
use super::transaction::EventStoreTransaction;
use crate::engine::core::id::BatchIdGenerator;
use crate::engine::errors::StoreError;
use crate::engine::facade::{DocumentStore, DocumentTransaction};
use crate::shared::clock::{Clock, SystemClock};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Event store bound to one document facade.
///
/// Owns the store-wide [`BatchIdGenerator`], created on the first save and
/// seeded from the highest event id already persisted. Share it between
/// tasks behind an `Arc`; each task works through its own
/// [`EventStoreTransaction`].
pub struct EventStore<S: DocumentStore> {
    facade: S,
    settings: Arc<StoreSettings>,
    clock: Arc<dyn Clock>,
    generator: OnceCell<BatchIdGenerator>,
}

impl<S: DocumentStore> EventStore<S> {
    pub fn open(facade: S, settings: StoreSettings) -> Self {
        Self::with_clock(facade, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(facade: S, settings: StoreSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            facade,
            settings: Arc::new(settings),
            clock,
            generator: OnceCell::new(),
        }
    }

    #[inline]
    pub fn facade(&self) -> &S {
        &self.facade
    }

    #[inline]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub(crate) fn shared_settings(&self) -> Arc<StoreSettings> {
        Arc::clone(&self.settings)
    }

    /// The batch generator, if a save has already created it.
    pub fn batch_generator(&self) -> Option<&BatchIdGenerator> {
        self.generator.get()
    }

    /// Creates missing collections and the `StreamID` index. Safe to repeat.
    pub async fn upgrade(&self) -> Result<(), StoreError> {
        let existing: HashSet<String> = self.facade.collection_names().await?.into_iter().collect();
        let events = self.settings.events_collection();

        if !existing.contains(events) {
            info!(target: "batch_ledger::store", collection = events, "Creating events collection");
            self.facade.create_collection(events).await?;
        }
        let indexes = self.facade.indexes(events).await?;
        if !indexes.iter().any(|path| path == STREAM_ID_FIELD) {
            info!(target: "batch_ledger::store", collection = events, path = STREAM_ID_FIELD, "Creating index");
            self.facade.create_index(events, STREAM_ID_FIELD).await?;
        }

        for info_collection in self.settings.info_collections() {
            if !existing.contains(info_collection) {
                info!(target: "batch_ledger::store", collection = info_collection, "Creating stream info collection");
                self.facade.create_collection(info_collection).await?;
            }
        }
        Ok(())
    }

    /// Opens a facade transaction and wraps it.
    pub async fn begin(&self) -> Result<EventStoreTransaction<'_, S>, StoreError> {
        let tx = self.facade.begin().await?;
        Ok(EventStoreTransaction::new(self, tx))
    }

    /// Compiles read criteria, e.g.
    /// `store.create_criteria(|c| { c.stream(id).event_type::<Deposited>(); })`.
    pub fn create_criteria<F>(&self, build: F) -> Result<Criteria, StoreError>
    where
        F: FnOnce(&mut CriteriaBuilder<'_>),
    {
        let mut builder = CriteriaBuilder::new(self.settings.event_types());
        build(&mut builder);
        builder.build()
    }

    /// Returns the generator, seeding it through `tx` on first use.
    pub(crate) async fn generator(
        &self,
        tx: &mut S::Transaction,
    ) -> Result<&BatchIdGenerator, StoreError> {
        self.generator
            .get_or_try_init(|| async move {
                let events = self.settings.events_collection();
                let last_known = match tx.max_key(events).await? {
                    Some(key) => Some(decode_event_key(&key)?),
                    None => None,
                };
                debug!(
                    target: "batch_ledger::store",
                    last_known = ?last_known.map(|id| id.raw()),
                    "Creating batch generator"
                );
                Ok::<_, StoreError>(BatchIdGenerator::with_policy(
                    last_known,
                    Arc::clone(&self.clock),
                    self.settings.retry_policy(),
                ))
            })
            .await
    }
}
