pub mod engine;
pub mod logging;
pub mod shared;

pub use engine::core::event::{
    EventBatch, EventMetadata, EventPayload, RecordedBatch, RecordedEvent, StreamId,
    StreamLocator, StreamType,
};
pub use engine::core::id::{BatchId, BatchIdGenerator, EventId};
pub use engine::errors::{ErrorKind, FacadeError, IdError, StoreError};
pub use engine::facade::{DocumentStore, DocumentTransaction, MemoryDocumentStore};
pub use engine::store::{Criteria, EventStore, EventStoreTransaction, StoreSettings};

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
