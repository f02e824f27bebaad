use super::documents::{EVENT_TYPE_PATH, STREAM_ID_FIELD};
use crate::engine::core::event::{StreamId, TypeRegistry};
use crate::engine::errors::StoreError;
use crate::engine::facade::Filter;
use serde_json::Value;

/// Compiled read filter. Only the store can interpret it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    filter: Filter,
}

impl Criteria {
    /// Matches every event.
    pub fn all() -> Self {
        Self::default()
    }

    pub(crate) fn filter(&self) -> &Filter {
        &self.filter
    }
}

/// Collects stream and event type conditions.
///
/// Streams are OR-ed together, event types are OR-ed together, and the two
/// groups are AND-ed.
pub struct CriteriaBuilder<'a> {
    registry: &'a TypeRegistry,
    streams: Vec<StreamId>,
    event_types: Vec<String>,
    unknown_type: Option<&'static str>,
}

impl<'a> CriteriaBuilder<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            streams: Vec::new(),
            event_types: Vec::new(),
            unknown_type: None,
        }
    }

    pub fn stream(&mut self, id: StreamId) -> &mut Self {
        if !self.streams.contains(&id) {
            self.streams.push(id);
        }
        self
    }

    /// Restricts to events of type `T`, resolved through the type registry.
    pub fn event_type<T: 'static>(&mut self) -> &mut Self {
        match self.registry.discriminator_of::<T>() {
            Some(name) => {
                if !self.event_types.iter().any(|t| t == name) {
                    self.event_types.push(name.to_string());
                }
            }
            None if self.unknown_type.is_none() => {
                self.unknown_type = Some(std::any::type_name::<T>());
            }
            None => {}
        }
        self
    }

    pub(crate) fn build(self) -> Result<Criteria, StoreError> {
        if let Some(type_name) = self.unknown_type {
            return Err(StoreError::UnregisteredEventType(type_name.to_string()));
        }

        let mut filter = Filter::All;
        if !self.streams.is_empty() {
            let ids = self
                .streams
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<Value>, _>>()?;
            filter = filter.and(Filter::one_of(STREAM_ID_FIELD, ids));
        }
        if !self.event_types.is_empty() {
            let names = self.event_types.into_iter().map(Value::String).collect();
            filter = filter.and(Filter::one_of(EVENT_TYPE_PATH, names));
        }
        Ok(Criteria { filter })
    }
}
