use crate::engine::core::event::{
    EventMetadata, EventPayload, NewEvent, StreamId, StreamInfo, TypeRegistry,
};
use crate::engine::core::id::EventId;
use crate::engine::errors::{FacadeError, StoreError};
use crate::engine::facade::{DocKey, Document};
use crate::engine::store::documents::{
    decode_event, decode_event_key, encode_event, encode_stream_info, event_key, stream_key,
};
use crate::test_helpers::factories::{Deposited, LedgerEvent, RecordedEventFactory, Withdrawn};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register::<Deposited>("Deposited")
        .register::<Withdrawn>("Withdrawn");
    registry
}

fn sample_id() -> EventId {
    RecordedEventFactory::new()
        .with_batch(RecordedEventFactory::batch_at(3600, 120))
        .create()
        .id()
}

#[test]
fn encode_event_lays_out_stored_fields() {
    let id = sample_id();
    let stream_id = StreamId::new();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let command = Uuid::new_v4();
    let event = NewEvent {
        event: LedgerEvent::deposit(250),
        metadata: Some(EventMetadata::new(at).caused_by(command)),
    };

    let doc = encode_event(id, stream_id, &event).unwrap();

    assert_eq!(doc.key, DocKey::Int(id.raw()));
    assert_eq!(doc.body["_id"], json!(id.raw()));
    assert_eq!(doc.body["StreamID"], json!(stream_id.to_string()));
    assert_eq!(doc.body["e"], json!({"_t": "Deposited", "amount": 250}));
    assert_eq!(doc.body["m"]["parent"], json!(command.to_string()));
    assert!(doc.body["m"]["ts"].is_string());
}

#[test]
fn encode_event_without_metadata_stores_null() {
    let event = NewEvent {
        event: LedgerEvent::withdraw(1),
        metadata: None,
    };
    let doc = encode_event(sample_id(), StreamId::new(), &event).unwrap();
    assert!(doc.body["m"].is_null());
}

#[test]
fn decode_event_reverses_encode() {
    let id = sample_id();
    let stream_id = StreamId::new();
    let event = NewEvent {
        event: LedgerEvent::withdraw(75),
        metadata: Some(EventMetadata::new(Utc::now())),
    };
    let doc = encode_event(id, stream_id, &event).unwrap();

    let recorded = decode_event::<LedgerEvent>(doc, &registry()).unwrap();
    assert_eq!(recorded.id(), id);
    assert_eq!(recorded.stream_id(), stream_id);
    assert_eq!(recorded.event(), &LedgerEvent::withdraw(75));
    assert_eq!(recorded.metadata(), event.metadata.as_ref());
}

#[test]
fn decode_event_rejects_unregistered_discriminator() {
    let event = NewEvent {
        event: LedgerEvent::close("fraud"),
        metadata: None,
    };
    let doc = encode_event(sample_id(), StreamId::new(), &event).unwrap();

    match decode_event::<LedgerEvent>(doc, &registry()) {
        Err(StoreError::UnknownDiscriminator(name)) => assert_eq!(name, "Closed"),
        other => panic!("unexpected result: {:?}", other.map(|e| e.id())),
    }
}

#[test]
fn decode_event_requires_discriminator() {
    let id = sample_id();
    let doc = Document::new(
        event_key(id),
        json!({"_id": id.raw(), "StreamID": StreamId::new(), "e": {"amount": 1}}),
    );
    let err = decode_event::<LedgerEvent>(doc, &registry()).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Facade(FacadeError::MalformedDocument(_))
    ));
}

#[test]
fn stream_info_is_keyed_by_uuid_bytes() {
    let info = StreamInfo {
        stream_id: StreamId::new(),
        stream_type: "Account".to_string(),
    };
    let doc = encode_stream_info(&info).unwrap();

    assert_eq!(doc.key, stream_key(info.stream_id));
    assert_eq!(doc.key, DocKey::Binary(info.stream_id.as_bytes().to_vec()));
    assert_eq!(doc.body["type"], "Account");
    assert_eq!(doc.body["_id"], json!(info.stream_id.to_string()));
}

#[test]
fn event_key_round_trips_and_rejects_other_keys() {
    let id = sample_id();
    assert_eq!(decode_event_key(&event_key(id)).unwrap(), id);
    assert!(decode_event_key(&DocKey::Text("x".into())).is_err());
    assert!(matches!(
        decode_event_key(&DocKey::Int(0)),
        Err(StoreError::Id(_))
    ));
}

/// Serde tag and reported discriminator disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "_t")]
enum RenamedEvent {
    #[serde(rename = "DepositedV2")]
    Deposited { amount: u64 },
}

impl EventPayload for RenamedEvent {
    fn discriminator(&self) -> &str {
        "Deposited"
    }
}

#[test]
fn encode_event_refuses_conflicting_tag() {
    let event = NewEvent {
        event: RenamedEvent::Deposited { amount: 3 },
        metadata: None,
    };

    let err = encode_event(sample_id(), StreamId::new(), &event).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Facade(FacadeError::MalformedDocument(_))
    ));
}
