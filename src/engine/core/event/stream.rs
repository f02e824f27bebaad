use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// Identity of one stream instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(Uuid);

impl StreamId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for StreamId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Kind of aggregate a stream belongs to. `NAME` prefixes the stream
/// type's info collection.
pub trait StreamType: Send + Sync + 'static {
    const NAME: &'static str;
}

/// A stream id tagged with its stream type.
pub struct StreamLocator<T> {
    id: StreamId,
    _stream: PhantomData<fn() -> T>,
}

impl<T: StreamType> StreamLocator<T> {
    pub fn new(id: StreamId) -> Self {
        Self {
            id,
            _stream: PhantomData,
        }
    }

    #[inline]
    pub fn id(&self) -> StreamId {
        self.id
    }

    #[inline]
    pub fn stream_type(&self) -> &'static str {
        T::NAME
    }
}

impl<T> Clone for StreamLocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StreamLocator<T> {}

impl<T> PartialEq for StreamLocator<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for StreamLocator<T> {}

impl<T> Hash for StreamLocator<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for StreamLocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamLocator")
            .field("id", &self.id)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
