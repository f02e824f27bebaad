use super::stream::StreamId;
use crate::engine::core::id::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request context stored alongside an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    /// Command that caused the event, if any.
    #[serde(rename = "parent", default)]
    pub parent_command: Option<Uuid>,
}

impl EventMetadata {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            parent_command: None,
        }
    }

    pub fn caused_by(mut self, command_id: Uuid) -> Self {
        self.parent_command = Some(command_id);
        self
    }
}

/// An event as stored: immutable once its id has been assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent<E> {
    id: EventId,
    stream_id: StreamId,
    event: E,
    metadata: Option<EventMetadata>,
}

impl<E> RecordedEvent<E> {
    pub(crate) fn new(
        id: EventId,
        stream_id: StreamId,
        event: E,
        metadata: Option<EventMetadata>,
    ) -> Self {
        Self {
            id,
            stream_id,
            event,
            metadata,
        }
    }

    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[inline]
    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    #[inline]
    pub fn event(&self) -> &E {
        &self.event
    }

    #[inline]
    pub fn metadata(&self) -> Option<&EventMetadata> {
        self.metadata.as_ref()
    }

    pub fn into_event(self) -> E {
        self.event
    }
}

/// Marker document recording that a stream exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    #[serde(rename = "_id")]
    pub stream_id: StreamId,
    #[serde(rename = "type")]
    pub stream_type: String,
}
