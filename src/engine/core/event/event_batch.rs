use super::recorded_event::{EventMetadata, RecordedEvent};
use super::stream::{StreamId, StreamLocator, StreamType};
use crate::engine::core::id::BatchId;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

/// An event waiting for its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent<E> {
    pub event: E,
    pub metadata: Option<EventMetadata>,
}

/// Events for one stream, saved together under a single batch id.
#[derive(Debug, Clone)]
pub struct EventBatch<T, E> {
    stream: StreamLocator<T>,
    events: Vec<NewEvent<E>>,
}

impl<T: StreamType, E> EventBatch<T, E> {
    pub fn new(stream: StreamLocator<T>) -> Self {
        Self {
            stream,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: E) -> Self {
        self.push(event, None);
        self
    }

    pub fn push(&mut self, event: E, metadata: Option<EventMetadata>) {
        self.events.push(NewEvent { event, metadata });
    }

    #[inline]
    pub fn stream(&self) -> StreamLocator<T> {
        self.stream
    }

    #[inline]
    pub fn events(&self) -> &[NewEvent<E>] {
        &self.events
    }

    pub fn into_events(self) -> Vec<NewEvent<E>> {
        self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A saved batch recovered from storage: a run of events sharing a batch id.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch<E> {
    batch_id: BatchId,
    stream_id: StreamId,
    events: Vec<RecordedEvent<E>>,
}

impl<E> RecordedBatch<E> {
    fn start(event: RecordedEvent<E>) -> Self {
        Self {
            batch_id: event.id().batch_id(),
            stream_id: event.stream_id(),
            events: vec![event],
        }
    }

    #[inline]
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    #[inline]
    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    #[inline]
    pub fn events(&self) -> &[RecordedEvent<E>] {
        &self.events
    }

    pub fn into_events(self) -> Vec<RecordedEvent<E>> {
        self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Regroups an id-ordered event stream into [`RecordedBatch`]es.
///
/// Only the batch currently being assembled is buffered. A new group starts
/// whenever the batch id changes; the pending group is emitted when the
/// next one starts or the input ends. The first error ends the stream.
pub struct BatchGrouping<S, E> {
    inner: S,
    pending: Option<RecordedBatch<E>>,
    done: bool,
}

impl<S, E> BatchGrouping<S, E> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: None,
            done: false,
        }
    }
}

// `pending` is never pinned.
impl<S: Unpin, E> Unpin for BatchGrouping<S, E> {}

impl<S, E, Err> Stream for BatchGrouping<S, E>
where
    S: Stream<Item = Result<RecordedEvent<E>, Err>> + Unpin,
{
    type Item = Result<RecordedBatch<E>, Err>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.done {
                return Poll::Ready(this.pending.take().map(Ok));
            }

            match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                Some(Ok(event)) => {
                    let batch_id = event.id().batch_id();
                    match this.pending.as_mut() {
                        Some(group) if group.batch_id == batch_id => group.events.push(event),
                        _ => {
                            let finished = this.pending.replace(RecordedBatch::start(event));
                            if let Some(finished) = finished {
                                return Poll::Ready(Some(Ok(finished)));
                            }
                        }
                    }
                }
                Some(Err(err)) => {
                    this.done = true;
                    this.pending = None;
                    return Poll::Ready(Some(Err(err)));
                }
                None => this.done = true,
            }
        }
    }
}
