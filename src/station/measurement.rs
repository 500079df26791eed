//! Shared measurement guarded by a reader/writer lock.

use std::sync::{Arc, PoisonError, RwLock};

/// One published value.
///
/// `sequence` counts the writes that preceded it, starting at 0 for the
/// value taken at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub value: i64,
    pub sequence: u64,
}

/// Single mutable value with many concurrent readers and one writer.
///
/// Clones share the same lock.
#[derive(Debug, Clone)]
pub struct SharedMeasurement {
    inner: Arc<RwLock<Measurement>>,
}

impl SharedMeasurement {
    pub fn new(initial: i64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Measurement {
                value: initial,
                sequence: 0,
            })),
        }
    }

    /// Copy out the latest measurement.
    pub fn read(&self) -> Measurement {
        // A panicking writer cannot leave a half-written Copy value behind.
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the value, returning what was published.
    pub fn record(&self, value: i64) -> Measurement {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.value = value;
        guard.sequence += 1;
        *guard
    }
}
