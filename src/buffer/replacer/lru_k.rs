//! LRU-K replacement policy (two-list approximation).
//!
//! Frames are split into two classes by how often they have been accessed:
//!
//! ```text
//!   cold list (times < k)          hot list (times >= k)
//!   front = oldest first access    front = least recently used
//!   ┌───┬───┬───┐                  ┌───┬───┬───┐
//!   │ 4 │ 1 │ 7 │ ──promote──────▶ │ 2 │ 5 │ 3 │
//!   └───┴───┴───┘  (k-th access)   └───┴───┴───┘
//!     ▲ evict here first             ▲ evict here when cold has no victim
//! ```
//!
//! Cold frames are evicted first, FIFO by their first access. Hot frames
//! move to the back of the hot list on every access, so among hot frames
//! eviction is plain LRU.
//!
//! # Divergence from textbook LRU-K
//! True LRU-K evicts the frame with the largest backward k-distance (time
//! since its k-th most recent access). This replacer only remembers *that*
//! a frame crossed the k-access threshold, not its access timestamps, so
//! the hot list ranks frames by last access instead. Two hot frames whose
//! k-th most recent accesses are ordered differently from their last
//! accesses will be evicted in last-access order.

use log::trace;
use parking_lot::Mutex;

use super::access_list::AccessList;
use super::Replacer;
use crate::buffer::ReplacerStats;
use crate::common::config::MIN_REPLACER_K;
use crate::common::{Error, FrameId, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Cold,
    Hot,
}

/// Per-frame bookkeeping.
#[derive(Debug, Clone, Copy)]
struct FrameRecord {
    /// Accesses seen while cold. Stops counting once the frame is hot.
    times: usize,
    evictable: bool,
    tier: Tier,
}

/// Everything guarded by the replacer's lock.
#[derive(Debug)]
struct ReplacerState {
    /// Indexed by `frame_id.0`; `None` = untracked.
    records: Vec<Option<FrameRecord>>,
    cold: AccessList,
    hot: AccessList,
}

impl ReplacerState {
    fn new(num_frames: usize) -> Self {
        Self {
            records: vec![None; num_frames],
            cold: AccessList::with_capacity(num_frames),
            hot: AccessList::with_capacity(num_frames),
        }
    }

    fn list_mut(&mut self, tier: Tier) -> &mut AccessList {
        match tier {
            Tier::Cold => &mut self.cold,
            Tier::Hot => &mut self.hot,
        }
    }

    fn is_evictable(&self, frame_id: FrameId) -> bool {
        matches!(self.records[frame_id.0], Some(record) if record.evictable)
    }

    /// First evictable frame: cold front-to-back, then hot front-to-back.
    fn find_victim(&self) -> Option<FrameId> {
        self.cold
            .iter()
            .find(|&id| self.is_evictable(id))
            .or_else(|| self.hot.iter().find(|&id| self.is_evictable(id)))
    }

    /// Drop the record for `frame_id` and unlink it from its list.
    fn untrack(&mut self, frame_id: FrameId) -> Option<FrameRecord> {
        let record = self.records[frame_id.0].take()?;
        self.list_mut(record.tier).unlink(frame_id);
        Some(record)
    }
}

/// Approximate LRU-K frame replacer.
///
/// Tracks access counts and evictability for frames `0..num_frames` and
/// picks eviction victims. All operations take one internal lock for their
/// whole duration, so a shared `&LruKReplacer` can be used from many
/// threads.
///
/// # Contract
/// Passing a frame id `>= num_frames` to [`record_access`](Self::record_access)
/// or [`set_evictable`](Self::set_evictable), and removing a non-evictable
/// frame, are caller bugs and panic.
///
/// # Example
/// ```
/// use framecache::{FrameId, LruKReplacer};
///
/// let replacer = LruKReplacer::new(8, 2);
/// replacer.record_access(FrameId::new(1));
/// replacer.record_access(FrameId::new(2));
/// replacer.record_access(FrameId::new(1)); // frame 1 reaches k and goes hot
///
/// // Cold frames go first
/// assert_eq!(replacer.evict(), Some(FrameId::new(2)));
/// assert_eq!(replacer.evict(), Some(FrameId::new(1)));
/// assert_eq!(replacer.evict(), None);
/// ```
#[derive(Debug)]
pub struct LruKReplacer {
    state: Mutex<ReplacerState>,
    num_frames: usize,
    k: usize,
    stats: ReplacerStats,
}

impl LruKReplacer {
    /// Create a replacer for frames `0..num_frames` with history depth `k`.
    ///
    /// # Panics
    /// Panics if `num_frames` is 0 or `k` is 0.
    pub fn new(num_frames: usize, k: usize) -> Self {
        match Self::try_new(num_frames, k) {
            Ok(replacer) => replacer,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible constructor.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if `num_frames` is 0 or `k` is below
    /// [`MIN_REPLACER_K`].
    pub fn try_new(num_frames: usize, k: usize) -> Result<Self> {
        if num_frames == 0 {
            return Err(Error::InvalidConfig("num_frames must be > 0".into()));
        }
        if k < MIN_REPLACER_K {
            return Err(Error::InvalidConfig(format!(
                "k must be >= {}, got {}",
                MIN_REPLACER_K, k
            )));
        }

        Ok(Self {
            state: Mutex::new(ReplacerState::new(num_frames)),
            num_frames,
            k,
            stats: ReplacerStats::new(),
        })
    }

    /// Number of frames this replacer can track.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Accesses needed before a frame is promoted to the hot list.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Replacer statistics.
    pub fn stats(&self) -> &ReplacerStats {
        &self.stats
    }

    /// Record one access to `frame_id`.
    ///
    /// - Hot frame: moves to the back of the hot list.
    /// - Cold frame: access count goes up; at `k` it is promoted to the
    ///   back of the hot list.
    /// - Untracked frame: starts tracking with count 1, evictable, at the
    ///   back of the cold list (straight to hot when `k == 1`).
    ///
    /// # Panics
    /// Panics if `frame_id >= num_frames`.
    pub fn record_access(&self, frame_id: FrameId) {
        self.assert_in_range(frame_id);
        ReplacerStats::bump(&self.stats.accesses);

        let mut guard = self.state.lock();
        let state = &mut *guard;

        match state.records[frame_id.0].as_mut() {
            Some(record) if record.tier == Tier::Hot => {
                state.hot.move_to_back(frame_id);
            }
            Some(record) => {
                record.times += 1;
                if record.times >= self.k {
                    record.tier = Tier::Hot;
                    state.cold.unlink(frame_id);
                    state.hot.push_back(frame_id);
                    ReplacerStats::bump(&self.stats.promotions);
                    trace!(
                        "{} promoted to hot list after {} accesses",
                        frame_id,
                        record.times
                    );
                }
            }
            None => {
                let tier = if self.k <= 1 { Tier::Hot } else { Tier::Cold };
                state.records[frame_id.0] = Some(FrameRecord {
                    times: 1,
                    evictable: true,
                    tier,
                });
                state.list_mut(tier).push_back(frame_id);
            }
        }
    }

    /// Mark `frame_id` evictable or pinned. Untracked frames are ignored.
    ///
    /// # Panics
    /// Panics if `frame_id >= num_frames`.
    pub fn set_evictable(&self, frame_id: FrameId, evictable: bool) {
        self.assert_in_range(frame_id);

        let mut state = self.state.lock();
        if let Some(record) = state.records[frame_id.0].as_mut() {
            record.evictable = evictable;
        }
    }

    /// Stop tracking `frame_id`, discarding its access history.
    ///
    /// No-op if the frame is not tracked.
    ///
    /// # Panics
    /// Panics if the frame is tracked but not evictable.
    pub fn remove(&self, frame_id: FrameId) {
        let mut state = self.state.lock();

        match state.records.get(frame_id.0).copied().flatten() {
            None => return,
            Some(record) if !record.evictable => {
                drop(state);
                panic!("{}", Error::FrameNotEvictable(frame_id));
            }
            Some(_) => {}
        }

        state.untrack(frame_id);
        ReplacerStats::bump(&self.stats.removals);
    }

    /// Pick a victim, stop tracking it and return its id.
    ///
    /// Returns `None` when every tracked frame is pinned (or nothing is
    /// tracked). That is a normal state for a fully pinned buffer pool.
    pub fn evict(&self) -> Option<FrameId> {
        let mut state = self.state.lock();

        let Some(victim) = state.find_victim() else {
            ReplacerStats::bump(&self.stats.failed_evictions);
            return None;
        };

        if let Some(record) = state.untrack(victim) {
            trace!(
                "evicted {} from {:?} list ({} cold, {} hot left)",
                victim,
                record.tier,
                state.cold.len(),
                state.hot.len()
            );
        }
        ReplacerStats::bump(&self.stats.evictions);
        Some(victim)
    }

    /// Number of tracked frames that are currently evictable.
    pub fn size(&self) -> usize {
        let state = self.state.lock();
        state
            .records
            .iter()
            .flatten()
            .filter(|record| record.evictable)
            .count()
    }

    /// Whether `frame_id` currently has an access record.
    pub fn is_tracked(&self, frame_id: FrameId) -> bool {
        let state = self.state.lock();
        matches!(state.records.get(frame_id.0), Some(Some(_)))
    }

    fn assert_in_range(&self, frame_id: FrameId) {
        if frame_id.0 >= self.num_frames {
            panic!(
                "{}",
                Error::InvalidFrameId {
                    frame_id,
                    num_frames: self.num_frames,
                }
            );
        }
    }

    #[cfg(test)]
    fn lists(&self) -> (Vec<usize>, Vec<usize>) {
        let state = self.state.lock();
        debug_assert_eq!(
            state.cold.len() + state.hot.len(),
            state.records.iter().flatten().count()
        );
        (
            state.cold.iter().map(|f| f.0).collect(),
            state.hot.iter().map(|f| f.0).collect(),
        )
    }
}

impl Replacer for LruKReplacer {
    fn record_access(&self, frame_id: FrameId) {
        LruKReplacer::record_access(self, frame_id);
    }

    fn set_evictable(&self, frame_id: FrameId, evictable: bool) {
        LruKReplacer::set_evictable(self, frame_id, evictable);
    }

    fn remove(&self, frame_id: FrameId) {
        LruKReplacer::remove(self, frame_id);
    }

    fn evict(&self) -> Option<FrameId> {
        LruKReplacer::evict(self)
    }

    fn size(&self) -> usize {
        LruKReplacer::size(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::DEFAULT_REPLACER_K;

    fn fid(id: usize) -> FrameId {
        FrameId::new(id)
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(matches!(
            LruKReplacer::try_new(0, 2),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            LruKReplacer::try_new(4, 0),
            Err(Error::InvalidConfig(_))
        ));

        let replacer = LruKReplacer::try_new(4, 3).unwrap();
        assert_eq!(replacer.num_frames(), 4);
        assert_eq!(replacer.k(), 3);
    }

    #[test]
    fn test_default_k_needs_many_accesses() {
        let replacer = LruKReplacer::new(2, DEFAULT_REPLACER_K);
        for _ in 1..DEFAULT_REPLACER_K {
            replacer.record_access(fid(0));
        }
        assert_eq!(replacer.lists(), (vec![0], vec![]));

        replacer.record_access(fid(0));
        assert_eq!(replacer.lists(), (vec![], vec![0]));
    }

    #[test]
    fn test_first_access_goes_cold_and_evictable() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.record_access(fid(1));

        assert_eq!(replacer.lists(), (vec![1], vec![]));
        assert_eq!(replacer.size(), 1);
        assert!(replacer.is_tracked(fid(1)));
        assert!(!replacer.is_tracked(fid(2)));
    }

    #[test]
    fn test_promotion_at_k() {
        let replacer = LruKReplacer::new(4, 3);
        replacer.record_access(fid(0));
        replacer.record_access(fid(0));
        assert_eq!(replacer.lists(), (vec![0], vec![]));

        replacer.record_access(fid(0));
        assert_eq!(replacer.lists(), (vec![], vec![0]));
        assert_eq!(replacer.stats().snapshot().promotions, 1);
    }

    #[test]
    fn test_cold_order_ignores_reaccess() {
        let replacer = LruKReplacer::new(4, 3);
        replacer.record_access(fid(0));
        replacer.record_access(fid(1));
        replacer.record_access(fid(0)); // still cold, stays at front

        assert_eq!(replacer.lists(), (vec![0, 1], vec![]));
        assert_eq!(replacer.evict(), Some(fid(0)));
    }

    #[test]
    fn test_hot_access_moves_to_back() {
        let replacer = LruKReplacer::new(4, 1);
        replacer.record_access(fid(0));
        replacer.record_access(fid(1));
        replacer.record_access(fid(2));
        replacer.record_access(fid(0));

        assert_eq!(replacer.lists(), (vec![], vec![1, 2, 0]));
    }

    #[test]
    fn test_k_one_is_plain_lru() {
        let replacer = LruKReplacer::new(4, 1);
        for id in [1, 2, 3] {
            replacer.record_access(fid(id));
        }

        assert_eq!(replacer.evict(), Some(fid(1)));
        assert_eq!(replacer.evict(), Some(fid(2)));
        assert_eq!(replacer.evict(), Some(fid(3)));
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_cold_preferred_over_hot() {
        let replacer = LruKReplacer::new(8, 2);
        for id in [1, 2, 3] {
            replacer.record_access(fid(id));
        }

        assert_eq!(replacer.evict(), Some(fid(1)));

        // Frame 2 reaches k and goes hot; frame 3 is the oldest cold frame
        replacer.record_access(fid(2));
        assert_eq!(replacer.evict(), Some(fid(3)));
        assert_eq!(replacer.evict(), Some(fid(2)));
    }

    #[test]
    fn test_evict_skips_pinned() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.record_access(fid(0));
        replacer.record_access(fid(1));
        replacer.set_evictable(fid(0), false);

        assert_eq!(replacer.size(), 1);
        assert_eq!(replacer.evict(), Some(fid(1)));
        assert_eq!(replacer.evict(), None);
        assert_eq!(replacer.size(), 0);

        // Pinned frame is still tracked
        assert!(replacer.is_tracked(fid(0)));
        replacer.set_evictable(fid(0), true);
        assert_eq!(replacer.evict(), Some(fid(0)));
    }

    #[test]
    fn test_evict_falls_back_to_hot() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.record_access(fid(0));
        replacer.record_access(fid(0));
        replacer.record_access(fid(1));
        replacer.set_evictable(fid(1), false);

        assert_eq!(replacer.evict(), Some(fid(0)));
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_evict_empty() {
        let replacer = LruKReplacer::new(4, 2);
        assert_eq!(replacer.evict(), None);
        assert_eq!(replacer.stats().snapshot().failed_evictions, 1);
    }

    #[test]
    fn test_set_evictable_untracked_is_noop() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.set_evictable(fid(2), true);

        assert!(!replacer.is_tracked(fid(2)));
        assert_eq!(replacer.size(), 0);
    }

    #[test]
    fn test_remove() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.record_access(fid(0));
        replacer.record_access(fid(1));
        replacer.record_access(fid(1));

        replacer.remove(fid(0));
        replacer.remove(fid(1));
        assert_eq!(replacer.lists(), (vec![], vec![]));
        assert_eq!(replacer.size(), 0);

        // Untracked and out of range are both no-ops
        replacer.remove(fid(3));
        replacer.remove(fid(100));
        assert_eq!(replacer.stats().snapshot().removals, 2);
    }

    #[test]
    fn test_remove_resets_history() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.record_access(fid(0));
        replacer.record_access(fid(0));
        replacer.remove(fid(0));

        // Starts over in the cold list
        replacer.record_access(fid(0));
        assert_eq!(replacer.lists(), (vec![0], vec![]));
    }

    #[test]
    #[should_panic(expected = "cannot remove non-evictable Frame(0)")]
    fn test_remove_pinned_panics() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.record_access(fid(0));
        replacer.set_evictable(fid(0), false);
        replacer.remove(fid(0));
    }

    #[test]
    #[should_panic(expected = "invalid frame id Frame(4)")]
    fn test_record_access_out_of_range_panics() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.record_access(fid(4));
    }

    #[test]
    #[should_panic(expected = "invalid frame id Frame(9)")]
    fn test_set_evictable_out_of_range_panics() {
        let replacer = LruKReplacer::new(4, 2);
        replacer.set_evictable(fid(9), true);
    }

    #[test]
    fn test_usable_through_trait_object() {
        let replacer: Box<dyn Replacer> = Box::new(LruKReplacer::new(4, 2));
        replacer.record_access(fid(3));
        assert_eq!(replacer.size(), 1);
        assert_eq!(replacer.evict(), Some(fid(3)));
    }
}
