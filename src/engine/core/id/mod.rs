pub mod batch_id;
pub mod batch_id_generator;
pub mod bit_field;
pub mod event_id;
pub mod event_id_generator;

pub use batch_id::BatchId;
pub use batch_id_generator::{BatchIdGenerator, RetryPolicy};
pub use bit_field::BitField;
pub use event_id::{EPOCH_ZERO_SECS, EventId, MAX_BATCH_SEQUENCE, MAX_EVENT_SEQUENCE};
pub use event_id_generator::EventIdGenerator;

#[cfg(test)]
mod bit_field_test;
