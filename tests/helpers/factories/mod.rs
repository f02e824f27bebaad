pub mod event_batch_factory;
pub mod fixtures;
pub mod recorded_event_factory;
pub mod store_factory;

pub use event_batch_factory::EventBatchFactory;
pub use fixtures::{Account, Closed, Deposited, LedgerEvent, Order, Withdrawn};
pub use recorded_event_factory::RecordedEventFactory;
pub use store_factory::StoreFactory;

#[cfg(test)]
mod event_batch_factory_test;
#[cfg(test)]
mod store_factory_test;
