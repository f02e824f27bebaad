pub mod event_batch;
pub mod payload;
pub mod recorded_event;
pub mod stream;

pub use event_batch::{BatchGrouping, EventBatch, NewEvent, RecordedBatch};
pub use payload::{DISCRIMINATOR_FIELD, EventPayload, TypeRegistry};
pub use recorded_event::{EventMetadata, RecordedEvent, StreamInfo};
pub use stream::{StreamId, StreamLocator, StreamType};
