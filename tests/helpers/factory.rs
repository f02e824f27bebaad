pub use super::factories::{EventBatchFactory, RecordedEventFactory, StoreFactory};
use crate::engine::core::event::StreamType;

pub struct Factory;

impl Factory {
    pub fn event_batch<T: StreamType>() -> EventBatchFactory<T> {
        EventBatchFactory::new()
    }

    pub fn recorded_event() -> RecordedEventFactory {
        RecordedEventFactory::new()
    }

    pub fn store() -> StoreFactory {
        StoreFactory::new()
    }
}
