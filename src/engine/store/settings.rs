use crate::engine::core::event::{StreamType, TypeRegistry};
use crate::engine::core::id::RetryPolicy;
use crate::engine::errors::StoreError;
use crate::shared::config::Settings;
use std::any::TypeId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct StreamRegistration {
    name: &'static str,
    info_collection: String,
}

/// Everything an [`EventStore`](super::EventStore) needs to know up front:
/// collection names, registered stream and event types, and the generator's
/// retry policy. Owned by the store; there is no process-wide default.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    events_collection: String,
    info_suffix: String,
    event_types: TypeRegistry,
    streams: HashMap<TypeId, StreamRegistration>,
    retry_policy: RetryPolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::from_config(&Settings::default())
    }
}

impl StoreSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(settings: &Settings) -> Self {
        Self {
            events_collection: settings.store.events_collection.clone(),
            info_suffix: settings.store.info_suffix.clone(),
            event_types: TypeRegistry::new(),
            streams: HashMap::new(),
            retry_policy: RetryPolicy::from(&settings.generator),
        }
    }

    pub fn register_stream<T: StreamType>(mut self) -> Self {
        self.streams.insert(
            TypeId::of::<T>(),
            StreamRegistration {
                name: T::NAME,
                info_collection: format!("{}{}", T::NAME, self.info_suffix),
            },
        );
        self
    }

    pub fn register_event<T: 'static>(mut self, discriminator: impl Into<String>) -> Self {
        self.event_types.register::<T>(discriminator);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    #[inline]
    pub fn events_collection(&self) -> &str {
        &self.events_collection
    }

    /// Info collection of stream type `T`.
    pub fn info_collection<T: StreamType>(&self) -> Result<&str, StoreError> {
        self.streams
            .get(&TypeId::of::<T>())
            .map(|r| r.info_collection.as_str())
            .ok_or(StoreError::UnregisteredStreamType(T::NAME))
    }

    pub fn info_collections(&self) -> impl Iterator<Item = &str> {
        self.streams.values().map(|r| r.info_collection.as_str())
    }

    pub fn stream_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.streams.values().map(|r| r.name)
    }

    #[inline]
    pub fn event_types(&self) -> &TypeRegistry {
        &self.event_types
    }

    #[inline]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }
}
