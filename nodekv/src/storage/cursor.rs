//! Positioned cursors over a key range.
//!
//! A cursor starts unpositioned. `seek_first` / `seek_last` position it on
//! the first / last entry of its range, and `next` / `prev` step from there.
//! Every positioning call returns `false` once the cursor runs off the range
//! or hits an error; `error()` tells the two apart.
//!
//! # Buffer reuse
//!
//! `key()` and `value()` borrow buffers owned by the cursor. Implementations
//! are free to overwrite those buffers on the next step, so callers that keep
//! a value past the current step must copy it.
//!
//! # Release
//!
//! A cursor pins resources until `release()` is called. `ScopedCursor` ties
//! the release to scope exit so no scan path can leak one.

use std::ops::{Deref, DerefMut};

use crate::storage::StoreError;

/// Direction a scan walks its range in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Lowest key first.
    #[default]
    Forward,
    /// Highest key first.
    Reverse,
}

/// A cursor over the entries of one key range.
pub trait StoreCursor {
    /// Position on the first entry of the range.
    fn seek_first(&mut self) -> bool;

    /// Position on the last entry of the range.
    fn seek_last(&mut self) -> bool;

    /// Step to the next entry in key order.
    fn next(&mut self) -> bool;

    /// Step to the previous entry in key order.
    fn prev(&mut self) -> bool;

    /// Key at the current position. Empty when unpositioned.
    fn key(&self) -> &[u8];

    /// Value at the current position. Empty when unpositioned.
    fn value(&self) -> &[u8];

    /// The error that stopped the cursor, if any.
    fn error(&self) -> Option<&StoreError>;

    /// Release resources held by the cursor.
    ///
    /// Must be idempotent. A released cursor never positions again.
    fn release(&mut self);
}

/// Owns a cursor and releases it when dropped.
pub struct ScopedCursor<C: StoreCursor> {
    inner: C,
}

impl<C: StoreCursor> ScopedCursor<C> {
    /// Take ownership of `cursor`.
    pub const fn new(cursor: C) -> Self {
        Self { inner: cursor }
    }

    /// Step once in `direction`, seeking to the range edge when `first`.
    pub fn step(&mut self, direction: Direction, first: bool) -> bool {
        match (direction, first) {
            (Direction::Forward, true) => self.inner.seek_first(),
            (Direction::Forward, false) => self.inner.next(),
            (Direction::Reverse, true) => self.inner.seek_last(),
            (Direction::Reverse, false) => self.inner.prev(),
        }
    }

    /// The cursor's error as an owned value.
    pub fn status(&self) -> Result<(), StoreError> {
        self.inner.error().map_or(Ok(()), |e| Err(e.clone()))
    }
}

impl<C: StoreCursor> Deref for ScopedCursor<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: StoreCursor> DerefMut for ScopedCursor<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: StoreCursor> Drop for ScopedCursor<C> {
    fn drop(&mut self) {
        self.inner.release();
    }
}
