//! Mapping between recorded events and facade documents.

use crate::engine::core::event::{
    DISCRIMINATOR_FIELD, EventMetadata, EventPayload, NewEvent, RecordedEvent, StreamId,
    StreamInfo, TypeRegistry,
};
use crate::engine::core::id::EventId;
use crate::engine::errors::{FacadeError, StoreError};
use crate::engine::facade::{DocKey, Document};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const KEY_FIELD: &str = "_id";
pub const STREAM_ID_FIELD: &str = "StreamID";
pub const EVENT_FIELD: &str = "e";
pub const METADATA_FIELD: &str = "m";
pub const EVENT_TYPE_PATH: &str = "e._t";

#[derive(Deserialize)]
struct StoredEvent<E> {
    #[serde(rename = "_id")]
    id: EventId,
    #[serde(rename = "StreamID")]
    stream_id: StreamId,
    e: E,
    #[serde(default)]
    m: Option<EventMetadata>,
}

pub fn event_key(id: EventId) -> DocKey {
    DocKey::Int(id.raw())
}

pub fn stream_key(id: StreamId) -> DocKey {
    DocKey::Binary(id.as_bytes().to_vec())
}

/// Builds the stored form of `event`, making sure the payload carries its
/// discriminator. A serialized `_t` that disagrees with
/// [`EventPayload::discriminator`] is refused.
pub fn encode_event<E: EventPayload>(
    id: EventId,
    stream_id: StreamId,
    event: &NewEvent<E>,
) -> Result<Document, StoreError> {
    let mut payload = serde_json::to_value(&event.event)?;
    let fields = payload.as_object_mut().ok_or_else(|| {
        FacadeError::MalformedDocument(format!(
            "payload {} does not serialize to an object",
            event.event.discriminator()
        ))
    })?;
    let discriminator = event.event.discriminator();
    match fields.get(DISCRIMINATOR_FIELD).cloned() {
        None => {
            fields.insert(
                DISCRIMINATOR_FIELD.to_string(),
                Value::String(discriminator.to_string()),
            );
        }
        Some(Value::String(ref tag)) if tag == discriminator => {}
        Some(other) => {
            return Err(FacadeError::MalformedDocument(format!(
                "payload serializes {} as {} but reports discriminator {}",
                DISCRIMINATOR_FIELD, other, discriminator
            ))
            .into());
        }
    }

    let mut body = Map::new();
    body.insert(KEY_FIELD.to_string(), Value::from(id.raw()));
    body.insert(STREAM_ID_FIELD.to_string(), serde_json::to_value(stream_id)?);
    body.insert(EVENT_FIELD.to_string(), payload);
    body.insert(
        METADATA_FIELD.to_string(),
        serde_json::to_value(&event.metadata)?,
    );
    let body = Value::Object(body);
    Ok(Document::new(event_key(id), body))
}

/// Parses a stored event, refusing payloads whose discriminator is unknown.
pub fn decode_event<E: EventPayload>(
    doc: Document,
    registry: &TypeRegistry,
) -> Result<RecordedEvent<E>, StoreError> {
    let discriminator = doc
        .body
        .get(EVENT_FIELD)
        .and_then(|e| e.get(DISCRIMINATOR_FIELD))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            FacadeError::MalformedDocument(format!("event {} has no discriminator", doc.key))
        })?;
    if !registry.contains(discriminator) {
        return Err(StoreError::UnknownDiscriminator(discriminator.to_string()));
    }

    let stored: StoredEvent<E> = serde_json::from_value(doc.body)?;
    Ok(RecordedEvent::new(stored.id, stored.stream_id, stored.e, stored.m))
}

pub fn encode_stream_info(info: &StreamInfo) -> Result<Document, StoreError> {
    Ok(Document::new(
        stream_key(info.stream_id),
        serde_json::to_value(info)?,
    ))
}

/// Recovers the event id from a primary key read back from storage.
pub fn decode_event_key(key: &DocKey) -> Result<EventId, StoreError> {
    match key {
        DocKey::Int(raw) => Ok(EventId::from_raw(*raw)?),
        other => Err(FacadeError::MalformedDocument(format!(
            "event key {} is not an integer",
            other
        ))
        .into()),
    }
}
