use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};

/// Field of a stored payload carrying its discriminator.
pub const DISCRIMINATOR_FIELD: &str = "_t";

/// A domain event payload.
///
/// Implemented by a closed sum type, typically an enum with
/// `#[serde(tag = "_t")]` whose variants wrap one struct per event type.
pub trait EventPayload: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Discriminator written next to the payload.
    fn discriminator(&self) -> &str;
}

/// Maps Rust event types to the discriminators they are persisted under.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    by_type: HashMap<TypeId, String>,
    discriminators: HashSet<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: 'static>(&mut self, discriminator: impl Into<String>) -> &mut Self {
        let discriminator = discriminator.into();
        self.discriminators.insert(discriminator.clone());
        self.by_type.insert(TypeId::of::<T>(), discriminator);
        self
    }

    pub fn discriminator_of<T: 'static>(&self) -> Option<&str> {
        self.by_type.get(&TypeId::of::<T>()).map(String::as_str)
    }

    pub fn contains(&self, discriminator: &str) -> bool {
        self.discriminators.contains(discriminator)
    }

    pub fn len(&self) -> usize {
        self.discriminators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discriminators.is_empty()
    }
}
