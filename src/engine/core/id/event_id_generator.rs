use super::batch_id::BatchId;
use super::event_id::EventId;
use crate::engine::errors::IdError;

/// Hands out the dense run of event ids belonging to one batch.
///
/// Owned by a single save operation; it is not shared between tasks.
#[derive(Debug, Clone)]
pub struct EventIdGenerator {
    current: EventId,
    issued: bool,
}

impl EventIdGenerator {
    pub fn new(batch: BatchId) -> Result<Self, IdError> {
        Ok(Self {
            current: EventId::first(batch)?,
            issued: false,
        })
    }

    #[inline]
    pub fn batch_id(&self) -> BatchId {
        self.current.batch_id()
    }

    /// Returns the first id of the batch on the first call, then its
    /// successors. Fails once the batch's 65535 ids are used up.
    pub fn next_id(&mut self) -> Result<EventId, IdError> {
        if self.issued {
            self.current = self.current.next()?;
        } else {
            self.issued = true;
        }
        Ok(self.current)
    }
}
