//! Replacer statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by [`LruKReplacer`](crate::buffer::replacer::LruKReplacer).
///
/// All fields are atomic so they can be read without taking the replacer's
/// lock. `Ordering::Relaxed` is enough: the counters are independent and
/// only need to be atomic, not ordered with respect to each other.
///
/// # Example
/// ```
/// use framecache::ReplacerStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = ReplacerStats::new();
/// stats.evictions.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().evictions, 1);
/// ```
#[derive(Debug, Default)]
pub struct ReplacerStats {
    /// Number of `record_access` calls.
    pub accesses: AtomicU64,

    /// Number of cold → hot promotions.
    pub promotions: AtomicU64,

    /// Number of frames handed out by `evict`.
    pub evictions: AtomicU64,

    /// Number of `evict` calls that found no evictable frame.
    pub failed_evictions: AtomicU64,

    /// Number of tracked frames dropped by `remove`.
    pub removals: AtomicU64,
}

impl ReplacerStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a point-in-time copy of the counters.
    pub fn snapshot(&self) -> ReplacerStatsSnapshot {
        ReplacerStatsSnapshot {
            accesses: self.accesses.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            failed_evictions: self.failed_evictions.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.accesses.store(0, Ordering::Relaxed);
        self.promotions.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.failed_evictions.store(0, Ordering::Relaxed);
        self.removals.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of replacer statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplacerStatsSnapshot {
    pub accesses: u64,
    pub promotions: u64,
    pub evictions: u64,
    pub failed_evictions: u64,
    pub removals: u64,
}

impl ReplacerStatsSnapshot {
    /// Fraction of `evict` calls that produced a victim (0.0 to 1.0).
    pub fn eviction_success_rate(&self) -> f64 {
        let total = self.evictions + self.failed_evictions;
        if total == 0 {
            0.0
        } else {
            self.evictions as f64 / total as f64
        }
    }
}

impl fmt::Display for ReplacerStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReplacerStats {{ accesses: {}, promotions: {}, evictions: {}, failed: {}, removals: {} }}",
            self.accesses, self.promotions, self.evictions, self.failed_evictions, self.removals
        )
    }
}
