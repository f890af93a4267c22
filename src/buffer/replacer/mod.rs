//! Eviction policy implementations (replacers).
//!
//! - [`Replacer`] - The interface a buffer pool drives eviction through
//! - [`LruKReplacer`] - Two-list approximate LRU-K

mod access_list;
mod lru_k;

pub use lru_k::LruKReplacer;

use crate::common::FrameId;

/// Tracks frame usage and chooses eviction victims.
///
/// Implementations do their own locking, so every method takes `&self` and
/// a buffer pool can share one replacer between threads.
pub trait Replacer: Send + Sync {
    /// Record an access to `frame_id`, starting to track it if needed.
    fn record_access(&self, frame_id: FrameId);

    /// Mark a tracked frame evictable (unpinned) or not (pinned).
    fn set_evictable(&self, frame_id: FrameId, evictable: bool);

    /// Stop tracking an evictable frame. No-op for untracked frames.
    fn remove(&self, frame_id: FrameId);

    /// Choose a victim and stop tracking it. `None` if nothing is evictable.
    fn evict(&self) -> Option<FrameId>;

    /// Number of evictable frames.
    fn size(&self) -> usize;
}
