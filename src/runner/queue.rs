//! Shared work queue drained by the workers.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A caller-supplied value plus its scheduling state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record<T> {
    pub value: T,
    /// Wait before the next attempt.
    pub delay: Duration,
    /// Failed attempts so far.
    pub try_count: u32,
}

impl<T> Record<T> {
    pub fn new(value: T, delay: Duration) -> Self {
        Self {
            value,
            delay,
            try_count: 0,
        }
    }

    /// The same record, rescheduled after one more failure.
    pub fn retry(self, delay: Duration) -> Self {
        Self {
            value: self.value,
            delay,
            try_count: self.try_count.saturating_add(1),
        }
    }
}

/// FIFO of records that have not yet succeeded.
///
/// The lock is only held for the duration of a single push or pop, never
/// across an await point.
#[derive(Debug)]
pub(crate) struct WorkQueue<T> {
    records: Mutex<VecDeque<Record<T>>>,
}

impl<T> WorkQueue<T> {
    pub fn new(records: impl IntoIterator<Item = Record<T>>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().collect()),
        }
    }

    /// Remove the record at the front, if any.
    pub fn pop(&self) -> Option<Record<T>> {
        self.lock().pop_front()
    }

    /// Append a record at the back.
    pub fn push(&self, record: Record<T>) {
        self.lock().push_back(record);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // Push and pop cannot leave the deque half-modified, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Record<T>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
