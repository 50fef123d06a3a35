//! In-memory ordered store.
//!
//! Entries live in a `BTreeMap` behind an `Arc<RwLock<..>>`, so any number of
//! readers can scan while a writer inserts. Cursors never hold the lock
//! between steps: each step takes a short read lock and re-seeks relative to
//! the key it is parked on. That keeps cursors `Send` and lets a scan run on
//! a background task.
//!
//! # Fault injection
//!
//! `FaultConfig` makes cursors fail after a fixed number of steps or with a
//! seeded per-step probability. Faults surface through `StoreCursor::error`
//! exactly like a real iterator error would.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::storage::{KeyRange, OrderedStore, StoreCursor, StoreError};

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// Configuration for cursor fault injection.
#[derive(Debug, Clone, Default)]
pub struct FaultConfig {
    /// Fail every cursor once it has taken this many steps.
    pub fail_after_steps: Option<usize>,
    /// Probability of a step failing (0.0 - 1.0).
    pub step_error_rate: f64,
    /// Seed for the per-cursor random number generators.
    pub seed: u64,
}

impl FaultConfig {
    /// No faults.
    #[must_use]
    pub fn no_faults() -> Self {
        Self::default()
    }

    /// Fail each cursor after `steps` successful steps.
    #[must_use]
    pub fn fail_after(steps: usize) -> Self {
        Self {
            fail_after_steps: Some(steps),
            ..Self::default()
        }
    }

    /// Fail each step with probability `rate`, deterministically per `seed`.
    #[must_use]
    pub fn random(rate: f64, seed: u64) -> Self {
        Self {
            fail_after_steps: None,
            step_error_rate: rate,
            seed,
        }
    }
}

/// Byte-ordered store kept entirely in memory.
///
/// Cloning is cheap and yields a handle to the same entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Entries>>,
    open_cursors: Arc<AtomicUsize>,
    cursors_opened: Arc<AtomicU64>,
    faults: FaultConfig,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose cursors fail according to `faults`.
    #[must_use]
    pub fn with_faults(faults: FaultConfig) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    /// Number of entries in the store.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries.read().map_err(|_| StoreError::LockPoisoned)?.len())
    }

    /// Check if the store has no entries.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Number of cursors handed out and not yet released.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

impl OrderedStore for MemoryStore {
    type Cursor = MemoryCursor;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    fn cursor(&self, range: &KeyRange) -> Result<MemoryCursor, StoreError> {
        let ordinal = self.cursors_opened.fetch_add(1, Ordering::SeqCst);
        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryCursor {
            entries: Arc::clone(&self.entries),
            open_cursors: Arc::clone(&self.open_cursors),
            lower: range.lower_bound(),
            upper: range.upper_bound(),
            key: Vec::new(),
            value: Vec::new(),
            state: CursorState::Unpositioned,
            error: None,
            released: false,
            steps: 0,
            fail_after_steps: self.faults.fail_after_steps,
            step_error_rate: self.faults.step_error_rate,
            rng: StdRng::seed_from_u64(self.faults.seed.wrapping_add(ordinal)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Unpositioned,
    Positioned,
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
enum Seek {
    First,
    Last,
    After,
    Before,
}

/// Cursor over a `MemoryStore` range.
///
/// The key and value buffers are reused across steps.
pub struct MemoryCursor {
    entries: Arc<RwLock<Entries>>,
    open_cursors: Arc<AtomicUsize>,
    lower: Bound<Vec<u8>>,
    upper: Bound<Vec<u8>>,
    key: Vec<u8>,
    value: Vec<u8>,
    state: CursorState,
    error: Option<StoreError>,
    released: bool,
    steps: usize,
    fail_after_steps: Option<usize>,
    step_error_rate: f64,
    rng: StdRng,
}

impl MemoryCursor {
    fn injected_fault(&mut self) -> Option<StoreError> {
        if let Some(limit) = self.fail_after_steps {
            if self.steps >= limit {
                return Some(StoreError::InjectedFault(format!(
                    "cursor failed after {limit} steps"
                )));
            }
        }
        if self.step_error_rate > 0.0 && self.rng.random::<f64>() < self.step_error_rate {
            return Some(StoreError::InjectedFault(format!(
                "cursor failed at step {}",
                self.steps
            )));
        }
        None
    }

    fn halt(&mut self, state: CursorState) -> bool {
        self.state = state;
        self.key.clear();
        self.value.clear();
        false
    }

    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    fn seek(&mut self, target: Seek) -> bool {
        if self.released || self.error.is_some() {
            return false;
        }
        let target = match (self.state, target) {
            (CursorState::Exhausted, Seek::After | Seek::Before) => return false,
            (CursorState::Unpositioned, Seek::After) => Seek::First,
            (CursorState::Unpositioned, Seek::Before) => Seek::Last,
            (_, target) => target,
        };

        if let Some(fault) = self.injected_fault() {
            self.error = Some(fault);
            return self.halt(CursorState::Exhausted);
        }
        self.steps += 1;

        let shared = Arc::clone(&self.entries);
        let Ok(entries) = shared.read() else {
            self.error = Some(StoreError::LockPoisoned);
            return self.halt(CursorState::Exhausted);
        };

        let lower = self.lower.as_ref().map(Vec::as_slice);
        let upper = self.upper.as_ref().map(Vec::as_slice);
        let (lower, upper, from_back) = match target {
            Seek::First => (lower, upper, false),
            Seek::Last => (lower, upper, true),
            Seek::After => (Bound::Excluded(self.key.as_slice()), upper, false),
            Seek::Before => (lower, Bound::Excluded(self.key.as_slice()), true),
        };

        let found = if bounds_ordered(lower, upper) {
            let mut window = entries.range::<[u8], _>((lower, upper));
            if from_back {
                window.next_back()
            } else {
                window.next()
            }
        } else {
            None
        };

        match found {
            Some((key, value)) => {
                self.key.clear();
                self.key.extend_from_slice(key);
                self.value.clear();
                self.value.extend_from_slice(value);
                self.state = CursorState::Positioned;
                true
            }
            None => self.halt(CursorState::Exhausted),
        }
    }
}

/// Check that `lower..upper` is a non-inverted range `BTreeMap::range` accepts.
fn bounds_ordered(lower: Bound<&[u8]>, upper: Bound<&[u8]>) -> bool {
    match (lower, upper) {
        (Bound::Included(l), Bound::Included(u)) => l <= u,
        (Bound::Included(l) | Bound::Excluded(l), Bound::Included(u) | Bound::Excluded(u)) => {
            l < u
        }
        _ => true,
    }
}

impl StoreCursor for MemoryCursor {
    fn seek_first(&mut self) -> bool {
        self.seek(Seek::First)
    }

    fn seek_last(&mut self) -> bool {
        self.seek(Seek::Last)
    }

    fn next(&mut self) -> bool {
        self.seek(Seek::After)
    }

    fn prev(&mut self) -> bool {
        self.seek(Seek::Before)
    }

    fn key(&self) -> &[u8] {
        &self.key
    }

    fn value(&self) -> &[u8] {
        &self.value
    }

    fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.halt(CursorState::Exhausted);
        self.open_cursors.fetch_sub(1, Ordering::SeqCst);
    }
}
