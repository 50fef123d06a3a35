//! Scan engines.
//!
//! All engines drive one cursor over one `KeyRange`:
//! - `bulk`: collect matching values and decode them in a single pass
//! - `stream`: push matching values through a channel from a background task
//! - `reverse`: list keys with a given suffix, highest key first
//!
//! `Scanner` is the shared loop for the first two. It walks the cursor in
//! the query's direction, runs the predicate, and hands out a private copy of
//! each accepted value (cursor buffers are reused on the next step).

pub mod bulk;
pub mod reverse;
pub mod stream;

pub use bulk::SearchOutcome;
pub use stream::{RecordStream, StreamEvent};

use tokio_util::sync::CancellationToken;

use crate::query::{CompiledQuery, Decision, ScanPredicate};
use crate::storage::{Direction, ScopedCursor, StoreCursor, StoreError};

/// Why a scan finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cursor ran off the end of the range.
    Exhausted,
    /// The page window was filled.
    PageFilled,
    /// The cursor reported an error.
    Fault,
    /// The scan's cancellation token fired.
    Cancelled,
}

/// Predicate-driven walk over one cursor.
pub struct Scanner<C: StoreCursor> {
    cursor: ScopedCursor<C>,
    predicate: ScanPredicate,
    direction: Direction,
    started: bool,
    stop: Option<StopReason>,
    cancel: Option<CancellationToken>,
}

impl<C: StoreCursor> Scanner<C> {
    /// Start a scan. `None` accepts every record in forward order.
    pub fn new(cursor: C, query: Option<CompiledQuery>) -> Self {
        let CompiledQuery {
            predicate,
            direction,
        } = query.unwrap_or_else(CompiledQuery::accept_all);
        Self {
            cursor: ScopedCursor::new(cursor),
            predicate,
            direction,
            started: false,
            stop: None,
            cancel: None,
        }
    }

    /// Stop the scan before the next cursor step once `cancel` fires.
    ///
    /// Checked on every step, including records the predicate skips.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Why the scan finished, or `None` while it is still running.
    #[must_use]
    pub const fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Advance to the next accepted record and return a copy of its value.
    ///
    /// Returns `Ok(None)` once the range is exhausted, the page window is
    /// filled or the scan is cancelled, and keeps returning it after that.
    ///
    /// # Errors
    ///
    /// Returns the cursor's error if the scan stopped on one.
    pub fn next_match(&mut self) -> Result<Option<Vec<u8>>, StoreError> {
        if self.stop.is_some() {
            return Ok(None);
        }
        loop {
            if self.is_cancelled() {
                self.stop = Some(StopReason::Cancelled);
                return Ok(None);
            }
            let first = !self.started;
            self.started = true;
            if !self.cursor.step(self.direction, first) {
                break;
            }
            match self.predicate.evaluate(self.cursor.key(), self.cursor.value()) {
                Decision::Accept => return Ok(Some(self.cursor.value().to_vec())),
                Decision::Skip => {}
                Decision::Stop => {
                    self.stop = Some(StopReason::PageFilled);
                    return Ok(None);
                }
            }
        }
        if let Err(e) = self.cursor.status() {
            self.stop = Some(StopReason::Fault);
            return Err(e);
        }
        self.stop = Some(StopReason::Exhausted);
        Ok(None)
    }
}
