use super::batch_id::BatchId;
use super::bit_field::BitField;
use crate::engine::errors::IdError;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 2015-01-01T00:00:00Z as Unix seconds.
pub const EPOCH_ZERO_SECS: i64 = 1_420_070_400;
/// Largest whole number of seconds after the epoch the id can carry.
pub const MAX_EPOCH_OFFSET_SECS: i64 = (1 << 31) - 1;

pub const MAX_BATCH_SEQUENCE: u16 = 511;
pub const MAX_EVENT_SEQUENCE: u16 = u16::MAX;

const SUBSECOND_UNIT_NANOS: u32 = 10_000_000;
const SUBSECOND_UNITS_PER_SECOND: u64 = 100;

const SECONDS_FIELD: BitField = BitField::new(32, 31);
const SUBSECOND_FIELD: BitField = BitField::new(25, 7);
const BATCH_SEQUENCE_FIELD: BitField = BitField::new(16, 9);
const EVENT_SEQUENCE_FIELD: BitField = BitField::new(0, 16);

/// Totally ordered identifier of a stored event.
///
/// Packs, from the most significant bit down: seconds since
/// [`EPOCH_ZERO_SECS`] (31 bits), 10ms units within the second (7 bits),
/// batch sequence (9 bits) and event sequence (16 bits). Comparing two ids
/// compares their packed values, which is the same as comparing timestamp,
/// batch sequence and event sequence in that order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub struct EventId {
    raw: u64,
    batch: BatchId,
    sequence: u16,
}

impl EventId {
    /// First id of `batch`.
    pub fn first(batch: BatchId) -> Result<Self, IdError> {
        Self::compose(batch, 1)
    }

    /// Last id `batch` can hold.
    pub fn last(batch: BatchId) -> Result<Self, IdError> {
        Self::compose(batch, MAX_EVENT_SEQUENCE)
    }

    /// Id number `sequence` of `batch`. Sequences start at 1.
    pub fn with_sequence(batch: BatchId, sequence: u16) -> Result<Self, IdError> {
        let id = Self::compose(batch, sequence)?;
        if sequence == 0 {
            return Err(IdError::InvalidEncoding(id.raw));
        }
        Ok(id)
    }

    /// The id following this one in the same batch.
    pub fn next(&self) -> Result<Self, IdError> {
        if self.sequence == MAX_EVENT_SEQUENCE {
            return Err(IdError::EventSequenceExhausted(self.batch));
        }
        Self::compose(self.batch, self.sequence + 1)
    }

    /// Decodes a packed id read back from storage.
    pub fn from_raw(raw: u64) -> Result<Self, IdError> {
        if raw >> 63 != 0 {
            return Err(IdError::InvalidEncoding(raw));
        }
        let seconds = SECONDS_FIELD.get_field(raw) as i64;
        let subseconds = SUBSECOND_FIELD.get_field(raw);
        let batch_sequence = BATCH_SEQUENCE_FIELD.get_field(raw) as u16;
        let sequence = EVENT_SEQUENCE_FIELD.get_field(raw) as u16;

        if subseconds >= SUBSECOND_UNITS_PER_SECOND || sequence == 0 {
            return Err(IdError::InvalidEncoding(raw));
        }

        let nanos = subseconds as u32 * SUBSECOND_UNIT_NANOS;
        let timestamp = DateTime::from_timestamp(EPOCH_ZERO_SECS + seconds, nanos)
            .ok_or(IdError::InvalidEncoding(raw))?;
        let batch = BatchId::from_parts(timestamp, batch_sequence)
            .map_err(|_| IdError::InvalidEncoding(raw))?;

        Ok(Self {
            raw,
            batch,
            sequence,
        })
    }

    /// Packed 64-bit form, as persisted.
    #[inline]
    pub fn raw(&self) -> u64 {
        self.raw
    }

    #[inline]
    pub fn batch_id(&self) -> BatchId {
        self.batch
    }

    #[inline]
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.batch.timestamp()
    }

    /// Checks that `timestamp` lies between the epoch and the last
    /// representable second.
    pub fn validate_timestamp(timestamp: DateTime<Utc>) -> Result<(), IdError> {
        let offset = timestamp.timestamp() - EPOCH_ZERO_SECS;
        if !(0..=MAX_EPOCH_OFFSET_SECS).contains(&offset) {
            return Err(IdError::TimestampOutOfRange(timestamp));
        }
        Ok(())
    }

    /// Floors `exact` to its 10ms bucket.
    pub fn truncate_timestamp(exact: DateTime<Utc>) -> DateTime<Utc> {
        // Leap-second instants report nanos past 1e9.
        let nanos = exact.nanosecond().min(999_999_999);
        let floored = nanos - nanos % SUBSECOND_UNIT_NANOS;
        exact.with_nanosecond(floored).unwrap_or(exact)
    }

    fn compose(batch: BatchId, sequence: u16) -> Result<Self, IdError> {
        let timestamp = batch.timestamp();
        Self::validate_timestamp(timestamp)?;

        let seconds = (timestamp.timestamp() - EPOCH_ZERO_SECS) as u64;
        let subseconds = (timestamp.nanosecond().min(999_999_999) / SUBSECOND_UNIT_NANOS) as u64;

        let raw = SECONDS_FIELD.set_field(seconds)?
            | SUBSECOND_FIELD.set_field(subseconds)?
            | BATCH_SEQUENCE_FIELD.set_field(batch.sequence() as u64)?
            | EVENT_SEQUENCE_FIELD.set_field(sequence as u64)?;

        Ok(Self {
            raw,
            batch,
            sequence,
        })
    }
}

impl PartialEq for EventId {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for EventId {}

impl PartialOrd for EventId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Hash for EventId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<EventId> for u64 {
    #[inline]
    fn from(value: EventId) -> u64 {
        value.raw
    }
}

impl TryFrom<u64> for EventId {
    type Error = IdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}
