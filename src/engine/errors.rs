use crate::engine::core::id::BatchId;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors raised while packing, unpacking or allocating identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Value {value} does not fit in a {size}-bit field")]
    FieldOverflow { value: u64, size: u32 },

    #[error("Timestamp {0} is outside the representable event id range")]
    TimestampOutOfRange(DateTime<Utc>),

    #[error("Clock moved backwards: last batch at {last}, clock reports {now}")]
    ClockRegression {
        last: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("Event sequence exhausted for batch {0}")]
    EventSequenceExhausted(BatchId),

    #[error("Batch sequence exhausted after {attempts} attempts; clock is not advancing")]
    BatchSequenceExhausted { attempts: u32 },

    #[error("Invalid packed event id: {0}")]
    InvalidEncoding(u64),
}

/// Errors raised by a document facade.
#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Duplicate key in collection {collection}: {key}")]
    DuplicateKey { collection: String, key: String },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

/// Errors surfaced by the event store transaction protocol.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Identifier error: {0}")]
    Id(#[from] IdError),

    #[error("Document facade error: {0}")]
    Facade(#[from] FacadeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stream type is not registered: {0}")]
    UnregisteredStreamType(&'static str),

    #[error("Event type is not registered: {0}")]
    UnregisteredEventType(String),

    #[error("Stored event has unknown discriminator: {0}")]
    UnknownDiscriminator(String),

    #[error("Batch of {len} events exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Setup problem; fails the operation, not the process.
    Configuration,
    /// Caller bug.
    Precondition,
    /// An assumption about the clock or throughput no longer holds.
    Fatal,
    /// The underlying document store failed.
    Storage,
}

impl IdError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdError::FieldOverflow { .. } | IdError::TimestampOutOfRange(_) => {
                ErrorKind::Precondition
            }
            IdError::ClockRegression { .. }
            | IdError::EventSequenceExhausted(_)
            | IdError::BatchSequenceExhausted { .. } => ErrorKind::Fatal,
            IdError::InvalidEncoding(_) => ErrorKind::Storage,
        }
    }
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Id(e) => e.kind(),
            StoreError::Facade(_) | StoreError::Serialization(_) => ErrorKind::Storage,
            StoreError::UnregisteredStreamType(_) | StoreError::UnregisteredEventType(_) => {
                ErrorKind::Configuration
            }
            StoreError::UnknownDiscriminator(_) => ErrorKind::Configuration,
            StoreError::BatchTooLarge { .. } => ErrorKind::Precondition,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }

    pub fn log_error(&self) {
        match self.kind() {
            ErrorKind::Fatal => {
                error!(target: "batch_ledger::store", "Fatal generator error: {}", self);
                debug!(target: "batch_ledger::store", "Fatal error details: {:?}", self);
            }
            ErrorKind::Configuration => {
                error!(target: "batch_ledger::store", "Configuration error: {}", self);
            }
            ErrorKind::Precondition => {
                warn!(target: "batch_ledger::store", "Rejected operation: {}", self);
            }
            ErrorKind::Storage => {
                error!(target: "batch_ledger::store", "Storage error: {}", self);
                debug!(target: "batch_ledger::store", "Storage error details: {:?}", self);
            }
        }
    }
}
