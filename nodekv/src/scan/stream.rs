//! Streaming reads.
//!
//! `spawn_stream` returns a `RecordStream` immediately and runs the scan on
//! a tokio task. The task sends each accepted value over a bounded channel in
//! scan order, then at most one `StreamEvent::Error`, then exactly one
//! `StreamEvent::End`.
//!
//! # Cancellation
//!
//! The scanner checks the stream's `CancellationToken` before every cursor
//! step, so a cancelled scan stops even while its filter skips records.
//! Every send also races the token. Cancelling (explicitly, or by dropping
//! the `RecordStream`) wakes a worker blocked on a full channel and makes it
//! exit without sending anything further. The worker owns its cursor through
//! a `ScopedCursor`, so the cursor is released on every exit path.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::QueryError;
use crate::query::CompiledQuery;
use crate::scan::{Scanner, StopReason};
use crate::storage::{KeyRange, StoreCursor};

/// One item delivered to a stream consumer.
#[derive(Debug)]
pub enum StreamEvent {
    /// A private copy of an accepted value.
    Record(Vec<u8>),
    /// The scan failed. `End` follows.
    Error(QueryError),
    /// No further events will arrive.
    End,
}

/// Consumer side of a streaming read.
pub struct RecordStream {
    rx: mpsc::Receiver<StreamEvent>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
    finished: bool,
}

impl RecordStream {
    /// Receive the next event.
    ///
    /// Returns `StreamEvent::End` once the stream has finished, including
    /// after cancellation, and on every call after that.
    pub async fn recv(&mut self) -> StreamEvent {
        if self.finished {
            return StreamEvent::End;
        }
        match self.rx.recv().await {
            Some(StreamEvent::End) | None => {
                self.finished = true;
                StreamEvent::End
            }
            Some(event) => event,
        }
    }

    /// Ask the worker to stop. Events already queued can still be received.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token that cancels this stream when cancelled.
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Token clones share one cancellation state
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Check whether the worker task has exited.
    #[must_use]
    pub fn is_worker_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Read every remaining record.
    ///
    /// # Errors
    ///
    /// Returns the scan's error if the worker reported one.
    pub async fn collect_records(mut self) -> Result<Vec<Vec<u8>>, QueryError> {
        let mut records = Vec::new();
        loop {
            match self.recv().await {
                StreamEvent::Record(value) => records.push(value),
                StreamEvent::Error(e) => return Err(e),
                StreamEvent::End => return Ok(records),
            }
        }
    }

    /// Cancel the worker and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        self.finished = true;
        self.rx.close();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::warn!("stream worker ended abnormally: {e}");
            }
        }
    }
}

impl Stream for RecordStream {
    type Item = Result<Vec<u8>, QueryError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        match this.rx.poll_recv(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(StreamEvent::Record(value))) => Poll::Ready(Some(Ok(value))),
            Poll::Ready(Some(StreamEvent::Error(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(Some(StreamEvent::End) | None) => {
                this.finished = true;
                Poll::Ready(None)
            }
        }
    }
}

impl Drop for RecordStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start a streaming scan of `range` on the current tokio runtime.
///
/// # Errors
///
/// Returns `QueryError::NoRuntime` when called outside a tokio runtime. The
/// cursor is released before returning.
#[allow(clippy::disallowed_methods)] // Token clones share one cancellation state
pub fn spawn_stream<C>(
    cursor: C,
    range: KeyRange,
    query: Option<CompiledQuery>,
    capacity: usize,
) -> Result<RecordStream, QueryError>
where
    C: StoreCursor + Send + 'static,
{
    let scanner = Scanner::new(cursor, query);
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        return Err(QueryError::NoRuntime);
    };

    let (tx, rx) = mpsc::channel(capacity.max(1));
    let cancel = CancellationToken::new();
    let scanner = scanner.with_cancellation(cancel.clone());
    let worker = handle.spawn(stream_worker(scanner, range, tx, cancel.clone()));

    Ok(RecordStream {
        rx,
        cancel,
        worker: Some(worker),
        finished: false,
    })
}

/// Drive `scanner` to completion, sending each accepted value.
async fn stream_worker<C: StoreCursor>(
    mut scanner: Scanner<C>,
    range: KeyRange,
    tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
) {
    let mut sent = 0usize;
    loop {
        let event = match scanner.next_match() {
            Ok(Some(value)) => StreamEvent::Record(value),
            Ok(None) if scanner.stop_reason() == Some(StopReason::Cancelled) => {
                tracing::trace!("stream over {range} cancelled after {sent} records");
                return;
            }
            Ok(None) => break,
            Err(source) => {
                tracing::warn!("stream over {range} failed after {sent} records: {source}");
                let error = QueryError::Iterator {
                    range: range.clone(),
                    source,
                };
                if !send(&tx, &cancel, StreamEvent::Error(error)).await {
                    tracing::trace!("stream over {range} cancelled while reporting an error");
                    return;
                }
                break;
            }
        };
        if !send(&tx, &cancel, event).await {
            tracing::trace!("stream over {range} cancelled after {sent} records");
            return;
        }
        sent += 1;
    }

    if send(&tx, &cancel, StreamEvent::End).await {
        tracing::debug!(
            "stream over {range} sent {sent} records ({:?})",
            scanner.stop_reason()
        );
    } else {
        tracing::trace!("stream over {range} cancelled before end of stream");
    }
}

/// Send `event` unless the stream is cancelled or its consumer is gone.
async fn send(
    tx: &mpsc::Sender<StreamEvent>,
    cancel: &CancellationToken,
    event: StreamEvent,
) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        result = tx.send(event) => result.is_ok(),
    }
}
