use super::event_id::{EventId, MAX_BATCH_SEQUENCE};
use crate::engine::errors::IdError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// A 10ms time bucket plus the ordinal of a batch inside that bucket.
///
/// Values are immutable; [`BatchId::try_advance`] hands back the successor
/// instead of changing `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId {
    timestamp: DateTime<Utc>,
    sequence: u16,
}

impl BatchId {
    /// First batch of the bucket containing `timestamp`.
    pub fn new(timestamp: DateTime<Utc>) -> Result<Self, IdError> {
        EventId::validate_timestamp(timestamp)?;
        Ok(Self {
            timestamp: EventId::truncate_timestamp(timestamp),
            sequence: 1,
        })
    }

    /// Batch `sequence` of the bucket containing `timestamp`.
    pub fn from_parts(timestamp: DateTime<Utc>, sequence: u16) -> Result<Self, IdError> {
        EventId::validate_timestamp(timestamp)?;
        if !(1..=MAX_BATCH_SEQUENCE).contains(&sequence) {
            return Err(IdError::FieldOverflow {
                value: sequence as u64,
                size: 9,
            });
        }
        Ok(Self {
            timestamp: EventId::truncate_timestamp(timestamp),
            sequence,
        })
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Successor of this batch for a clock reading of `timestamp`.
    ///
    /// Within the same bucket the sequence is bumped; a later bucket starts
    /// over at sequence 1. `Ok(None)` means the bucket already holds
    /// [`MAX_BATCH_SEQUENCE`] batches and the caller has to wait for the clock.
    pub fn try_advance(&self, timestamp: DateTime<Utc>) -> Result<Option<BatchId>, IdError> {
        if timestamp < self.timestamp {
            return Err(IdError::ClockRegression {
                last: self.timestamp,
                now: timestamp,
            });
        }

        let bucket = EventId::truncate_timestamp(timestamp);
        if bucket != self.timestamp {
            return Self::new(timestamp).map(Some);
        }

        if self.sequence >= MAX_BATCH_SEQUENCE {
            return Ok(None);
        }
        Ok(Some(Self {
            timestamp: self.timestamp,
            sequence: self.sequence + 1,
        }))
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.sequence
        )
    }
}
