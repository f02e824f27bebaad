pub mod criteria;
pub mod documents;
pub mod event_store;
pub mod settings;
pub mod transaction;

pub use criteria::{Criteria, CriteriaBuilder};
pub use event_store::EventStore;
pub use settings::StoreSettings;
pub use transaction::{BatchStream, EventStoreTransaction, EventStream};

#[cfg(test)]
mod documents_test;
#[cfg(test)]
mod settings_test;
