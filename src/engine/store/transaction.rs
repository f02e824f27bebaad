use super::criteria::Criteria;
use super::documents::{
    STREAM_ID_FIELD, decode_event, encode_event, encode_stream_info, stream_key,
};
use super::event_store::EventStore;
use super::settings::StoreSettings;
use crate::engine::core::event::{
    BatchGrouping, EventBatch, EventPayload, RecordedEvent, StreamInfo, StreamLocator, StreamType,
};
use crate::engine::core::id::MAX_EVENT_SEQUENCE;
use crate::engine::errors::StoreError;
use crate::engine::facade::{DocumentStore, DocumentTransaction, Filter, SortOrder};
use futures::StreamExt;
use futures::stream::BoxStream;
use std::sync::Arc;
use tracing::debug;

/// Recorded events in ascending id order.
pub type EventStream<E> = BoxStream<'static, Result<RecordedEvent<E>, StoreError>>;

/// Recorded events regrouped into the batches they were saved in.
pub type BatchStream<E> = BatchGrouping<EventStream<E>, E>;

/// Event store operations running inside one facade transaction.
///
/// Nothing is visible to other transactions until [`commit`](Self::commit).
/// Other writes the caller makes through [`facade_transaction`](Self::facade_transaction)
/// commit or roll back together with the events.
pub struct EventStoreTransaction<'a, S: DocumentStore> {
    store: &'a EventStore<S>,
    tx: S::Transaction,
}

impl<'a, S: DocumentStore> EventStoreTransaction<'a, S> {
    pub(crate) fn new(store: &'a EventStore<S>, tx: S::Transaction) -> Self {
        Self { store, tx }
    }

    /// The underlying facade transaction.
    pub fn facade_transaction(&mut self) -> &mut S::Transaction {
        &mut self.tx
    }

    /// Assigns ids to the batch and writes it together with the stream's
    /// info marker. All events of one call share a batch id. An empty batch
    /// writes nothing.
    pub async fn save<T, E>(
        &mut self,
        batch: EventBatch<T, E>,
    ) -> Result<Vec<RecordedEvent<E>>, StoreError>
    where
        T: StreamType,
        E: EventPayload,
    {
        let result = self.write_batch(batch).await;
        if let Err(err) = &result {
            err.log_error();
        }
        result
    }

    async fn write_batch<T, E>(
        &mut self,
        batch: EventBatch<T, E>,
    ) -> Result<Vec<RecordedEvent<E>>, StoreError>
    where
        T: StreamType,
        E: EventPayload,
    {
        let settings = self.store.settings();
        let info_collection = settings.info_collection::<T>()?.to_string();

        if batch.len() > MAX_EVENT_SEQUENCE as usize {
            return Err(StoreError::BatchTooLarge {
                len: batch.len(),
                max: MAX_EVENT_SEQUENCE as usize,
            });
        }
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        for pending in batch.events() {
            let discriminator = pending.event.discriminator();
            if !settings.event_types().contains(discriminator) {
                return Err(StoreError::UnregisteredEventType(discriminator.to_string()));
            }
        }

        let stream_id = batch.stream().id();
        let events_collection = settings.events_collection().to_string();

        let generator = self.store.generator(&mut self.tx).await?;
        let mut ids = generator.get_batch().await?;

        let mut docs = Vec::with_capacity(batch.len());
        let mut recorded = Vec::with_capacity(batch.len());
        for pending in batch.into_events() {
            let id = ids.next_id()?;
            docs.push(encode_event(id, stream_id, &pending)?);
            recorded.push(RecordedEvent::new(
                id,
                stream_id,
                pending.event,
                pending.metadata,
            ));
        }

        debug!(
            target: "batch_ledger::store",
            stream = %stream_id,
            stream_type = T::NAME,
            batch = %ids.batch_id(),
            count = docs.len(),
            "Saving event batch"
        );

        self.tx.insert_many(&events_collection, docs).await?;
        let info = StreamInfo {
            stream_id,
            stream_type: T::NAME.to_string(),
        };
        self.tx
            .upsert(&info_collection, encode_stream_info(&info)?)
            .await?;

        Ok(recorded)
    }

    /// Whether any events were ever saved for the stream.
    pub async fn exists<T: StreamType>(
        &mut self,
        locator: &StreamLocator<T>,
    ) -> Result<bool, StoreError> {
        let info_collection = self.store.settings().info_collection::<T>()?.to_string();
        Ok(self
            .tx
            .exists(&info_collection, &stream_key(locator.id()))
            .await?)
    }

    /// All events of one stream.
    pub fn get<T: StreamType, E: EventPayload>(
        &mut self,
        locator: &StreamLocator<T>,
    ) -> Result<EventStream<E>, StoreError> {
        let stream_id = serde_json::to_value(locator.id())?;
        Ok(self.find(Filter::eq(STREAM_ID_FIELD, stream_id), None))
    }

    /// Events matching `criteria`, ascending by id.
    pub fn get_by_criteria<E: EventPayload>(&mut self, criteria: &Criteria) -> EventStream<E> {
        self.find(criteria.filter().clone(), Some(SortOrder::KeyAscending))
    }

    /// Events matching `criteria` (or all events), regrouped into the
    /// batches they were saved in. Streams lazily.
    pub fn get_all<E: EventPayload>(&mut self, criteria: Option<&Criteria>) -> BatchStream<E> {
        let filter = criteria.map(|c| c.filter().clone()).unwrap_or_default();
        BatchGrouping::new(self.find(filter, Some(SortOrder::KeyAscending)))
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        Ok(self.tx.commit().await?)
    }

    pub async fn rollback(self) -> Result<(), StoreError> {
        Ok(self.tx.rollback().await?)
    }

    fn find<E: EventPayload>(&mut self, filter: Filter, sort: Option<SortOrder>) -> EventStream<E> {
        let settings: Arc<StoreSettings> = self.store.shared_settings();
        let collection = settings.events_collection().to_string();
        self.tx
            .find_all(&collection, filter, sort)
            .map(move |doc| decode_event::<E>(doc?, settings.event_types()))
            .boxed()
    }
}
