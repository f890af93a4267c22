//! Hash index statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Structural-change counters for
/// [`ExtendibleHashTable`](super::ExtendibleHashTable).
///
/// Atomic so they can be read without the table's lock.
#[derive(Debug, Default)]
pub struct HashTableStats {
    /// Number of bucket splits.
    pub splits: AtomicU64,

    /// Number of times the directory doubled.
    pub directory_doublings: AtomicU64,

    /// Inserts that had to overfill a bucket because every entry in it
    /// shares the same hash.
    pub overflow_inserts: AtomicU64,
}

impl HashTableStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a point-in-time copy of the counters.
    pub fn snapshot(&self) -> HashTableStatsSnapshot {
        HashTableStatsSnapshot {
            splits: self.splits.load(Ordering::Relaxed),
            directory_doublings: self.directory_doublings.load(Ordering::Relaxed),
            overflow_inserts: self.overflow_inserts.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of hash index statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashTableStatsSnapshot {
    pub splits: u64,
    pub directory_doublings: u64,
    pub overflow_inserts: u64,
}

impl fmt::Display for HashTableStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HashTableStats {{ splits: {}, doublings: {}, overflow_inserts: {} }}",
            self.splits, self.directory_doublings, self.overflow_inserts
        )
    }
}
