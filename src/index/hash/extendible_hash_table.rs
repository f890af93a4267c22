//! Extendible hash table.
//!
//! A directory of `2^global_depth` slots points at fixed-capacity buckets.
//! A key lives in the bucket of slot `hash(key) & (2^global_depth - 1)`, so
//! only the low-order hash bits matter. A bucket with local depth `d` is
//! shared by every slot that agrees on the low `d` bits.
//!
//! ```text
//!   global_depth = 2
//!
//!   slot  low bits          bucket
//!    0      00   ─────────▶ A  (local depth 2)
//!    1      01   ────┐
//!    3      11   ────┴────▶ B  (local depth 1)
//!    2      10   ─────────▶ C  (local depth 2)
//! ```
//!
//! When a bucket overflows it is split on hash bit `local_depth`. If its
//! local depth already equals the global depth, the directory first doubles
//! by copying slot `i` into slot `i + old_len`, which keeps every slot
//! pointing at the right bucket without rehashing anything. Buckets never
//! merge back on removal.
//!
//! Buckets live in an arena; the directory stores arena indices. A split
//! reuses the old bucket's arena slot for the "bit clear" half and appends
//! the "bit set" half.

use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use log::{debug, trace, warn};
use parking_lot::Mutex;

use super::bucket::Bucket;
use super::stats::HashTableStats;
use crate::common::config::{DEFAULT_BUCKET_SIZE, MIN_BUCKET_SIZE};
use crate::common::{Error, Result};

/// Mask selecting the low `depth` bits.
#[inline]
fn low_bits(depth: u32) -> usize {
    if depth >= usize::BITS {
        usize::MAX
    } else {
        (1usize << depth) - 1
    }
}

/// Directory plus bucket arena, guarded by the table's lock.
struct Directory<K, V> {
    global_depth: u32,
    /// Slot → index into `buckets`.
    slots: Vec<usize>,
    buckets: Vec<Bucket<K, V>>,
    /// Total number of entries.
    len: usize,
}

impl<K, V> Directory<K, V> {
    fn new(bucket_size: usize) -> Self {
        Self {
            global_depth: 0,
            slots: vec![0],
            buckets: vec![Bucket::new(bucket_size, 0)],
            len: 0,
        }
    }

    #[inline]
    fn bucket_index(&self, hash: u64) -> usize {
        self.slots[hash as usize & low_bits(self.global_depth)]
    }

    fn bucket_for(&self, hash: u64) -> &Bucket<K, V> {
        &self.buckets[self.bucket_index(hash)]
    }
}

/// Thread-safe extendible hash table.
///
/// Generic over any `K: Hash + Eq` and any hasher `S` (defaults to the
/// standard library's `RandomState`). All operations take one internal lock
/// for their whole duration.
///
/// # Example
/// ```
/// use framecache::ExtendibleHashTable;
///
/// let table = ExtendibleHashTable::new(2);
/// for i in 0..16 {
///     table.insert(i, i * 10);
/// }
///
/// assert_eq!(table.find(&7), Some(70));
/// assert!(table.remove(&7));
/// assert_eq!(table.find(&7), None);
/// assert!(table.num_buckets() >= 8);
/// ```
pub struct ExtendibleHashTable<K, V, S = RandomState> {
    dir: Mutex<Directory<K, V>>,
    bucket_size: usize,
    hash_builder: S,
    stats: HashTableStats,
}

impl<K: Hash + Eq, V> ExtendibleHashTable<K, V, RandomState> {
    /// Create an empty table whose buckets hold `bucket_size` entries.
    ///
    /// # Panics
    /// Panics if `bucket_size` is 0.
    pub fn new(bucket_size: usize) -> Self {
        Self::with_hasher(bucket_size, RandomState::new())
    }

    /// Fallible constructor.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if `bucket_size` is 0.
    pub fn try_new(bucket_size: usize) -> Result<Self> {
        Self::try_with_hasher(bucket_size, RandomState::new())
    }
}

impl<K: Hash + Eq, V> Default for ExtendibleHashTable<K, V, RandomState> {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_SIZE)
    }
}

impl<K, V, S> ExtendibleHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Create an empty table that hashes keys with `hash_builder`.
    ///
    /// # Panics
    /// Panics if `bucket_size` is 0.
    pub fn with_hasher(bucket_size: usize, hash_builder: S) -> Self {
        match Self::try_with_hasher(bucket_size, hash_builder) {
            Ok(table) => table,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible version of [`with_hasher`](Self::with_hasher).
    pub fn try_with_hasher(bucket_size: usize, hash_builder: S) -> Result<Self> {
        if bucket_size < MIN_BUCKET_SIZE {
            return Err(Error::InvalidConfig(format!(
                "bucket_size must be >= {}, got {}",
                MIN_BUCKET_SIZE, bucket_size
            )));
        }

        Ok(Self {
            dir: Mutex::new(Directory::new(bucket_size)),
            bucket_size,
            hash_builder,
            stats: HashTableStats::new(),
        })
    }

    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Look up `key`, returning a clone of its value.
    pub fn find(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let hash = self.hash(key);
        let dir = self.dir.lock();
        dir.bucket_for(hash).find(key).cloned()
    }

    /// Remove `key`. Returns false if it was not present.
    ///
    /// Buckets are never merged, so the directory does not shrink.
    pub fn remove(&self, key: &K) -> bool {
        let hash = self.hash(key);
        let mut guard = self.dir.lock();
        let dir = &mut *guard;

        let idx = dir.bucket_index(hash);
        let removed = dir.buckets[idx].remove(key);
        if removed {
            dir.len -= 1;
        }
        removed
    }

    /// Insert `key` → `value`, overwriting the value if the key exists.
    ///
    /// A full bucket is split (doubling the directory first when needed)
    /// and the insert retried until the key fits.
    pub fn insert(&self, key: K, value: V) {
        let hash = self.hash(&key);
        let mut guard = self.dir.lock();
        let dir = &mut *guard;

        let mut value = value;
        loop {
            let idx = dir.bucket_index(hash);
            let bucket = &mut dir.buckets[idx];

            value = match bucket.update(&key, value) {
                None => return,
                Some(value) => value,
            };

            if !bucket.is_full() {
                bucket.push(key, value);
                dir.len += 1;
                return;
            }

            // No number of splits can separate keys with identical hashes.
            if bucket.items().iter().all(|(k, _)| self.hash(k) == hash) {
                warn!(
                    "bucket of {} entries shares one hash ({:#x}); storing past capacity",
                    bucket.len(),
                    hash
                );
                bucket.push(key, value);
                dir.len += 1;
                HashTableStats::bump(&self.stats.overflow_inserts);
                return;
            }

            self.split(dir, idx);
        }
    }

    /// Split the bucket at arena index `idx` on its next hash bit.
    fn split(&self, dir: &mut Directory<K, V>, idx: usize) {
        let old_depth = dir.buckets[idx].depth();

        if old_depth == dir.global_depth {
            dir.slots.extend_from_within(..);
            dir.global_depth += 1;
            HashTableStats::bump(&self.stats.directory_doublings);
            debug!(
                "directory doubled to {} slots (global depth {})",
                dir.slots.len(),
                dir.global_depth
            );
        }

        let new_depth = old_depth + 1;
        let split_bit = 1usize << old_depth;

        let mut low = Bucket::new(self.bucket_size, new_depth);
        let mut high = Bucket::new(self.bucket_size, new_depth);
        for (k, v) in dir.buckets[idx].drain() {
            if (self.hash(&k) as usize & split_bit) == 0 {
                low.push(k, v);
            } else {
                high.push(k, v);
            }
        }
        trace!(
            "split bucket {} at depth {}: {} stay, {} move",
            idx,
            old_depth,
            low.len(),
            high.len()
        );

        let high_idx = dir.buckets.len();
        dir.buckets[idx] = low;
        dir.buckets.push(high);

        for (slot, target) in dir.slots.iter_mut().enumerate() {
            if *target == idx && (slot & split_bit) != 0 {
                *target = high_idx;
            }
        }
        HashTableStats::bump(&self.stats.splits);
    }

    /// Check every structural invariant of the directory and buckets.
    ///
    /// # Errors
    /// `Error::Corrupted` describing the first violation found.
    pub fn verify_integrity(&self) -> Result<()> {
        let dir = self.dir.lock();
        let global_depth = dir.global_depth;

        let expected_slots = 1usize << global_depth;
        if dir.slots.len() != expected_slots {
            return Err(Error::Corrupted(format!(
                "directory has {} slots, global depth {} needs {}",
                dir.slots.len(),
                global_depth,
                expected_slots
            )));
        }

        // Per bucket: how many slots reference it and which low bits they share.
        let mut refs = vec![0usize; dir.buckets.len()];
        let mut patterns: Vec<Option<usize>> = vec![None; dir.buckets.len()];

        for (slot, &idx) in dir.slots.iter().enumerate() {
            let bucket = dir.buckets.get(idx).ok_or_else(|| {
                Error::Corrupted(format!("slot {} points at missing bucket {}", slot, idx))
            })?;
            if bucket.depth() > global_depth {
                return Err(Error::Corrupted(format!(
                    "bucket {} has local depth {} above global depth {}",
                    idx,
                    bucket.depth(),
                    global_depth
                )));
            }

            let pattern = slot & low_bits(bucket.depth());
            match patterns[idx] {
                None => patterns[idx] = Some(pattern),
                Some(p) if p != pattern => {
                    return Err(Error::Corrupted(format!(
                        "slots sharing bucket {} disagree on low bits ({:#b} vs {:#b})",
                        idx, p, pattern
                    )));
                }
                Some(_) => {}
            }
            refs[idx] += 1;
        }

        let mut total = 0;
        for (idx, bucket) in dir.buckets.iter().enumerate() {
            let Some(shift) = global_depth.checked_sub(bucket.depth()) else {
                return Err(Error::Corrupted(format!(
                    "unreferenced bucket {} has local depth {} above global depth {}",
                    idx,
                    bucket.depth(),
                    global_depth
                )));
            };
            let expected_refs = 1usize << shift;
            if refs[idx] != expected_refs {
                return Err(Error::Corrupted(format!(
                    "bucket {} (local depth {}) referenced by {} slots, expected {}",
                    idx,
                    bucket.depth(),
                    refs[idx],
                    expected_refs
                )));
            }

            let mask = low_bits(bucket.depth());
            let pattern = patterns[idx].unwrap_or_default();
            let mut first_hash = None;
            let mut single_hash = true;
            for (k, _) in bucket.items() {
                let hash = self.hash(k);
                if (hash as usize & mask) != pattern {
                    return Err(Error::Corrupted(format!(
                        "bucket {} holds a key with hash {:#x} outside its slots",
                        idx, hash
                    )));
                }
                single_hash &= *first_hash.get_or_insert(hash) == hash;
            }

            if bucket.len() > self.bucket_size && !single_hash {
                return Err(Error::Corrupted(format!(
                    "bucket {} holds {} entries, capacity is {}",
                    idx,
                    bucket.len(),
                    self.bucket_size
                )));
            }
            total += bucket.len();
        }

        if total != dir.len {
            return Err(Error::Corrupted(format!(
                "buckets hold {} entries, table length says {}",
                total, dir.len
            )));
        }

        Ok(())
    }
}

impl<K, V, S> ExtendibleHashTable<K, V, S> {
    /// Number of low-order hash bits used to index the directory.
    pub fn global_depth(&self) -> u32 {
        self.dir.lock().global_depth
    }

    /// Local depth of the bucket behind directory slot `dir_index`.
    ///
    /// # Panics
    /// Panics if `dir_index >= 2^global_depth`.
    pub fn local_depth(&self, dir_index: usize) -> u32 {
        let dir = self.dir.lock();
        match dir.slots.get(dir_index) {
            Some(&idx) => dir.buckets[idx].depth(),
            None => {
                let len = dir.slots.len();
                drop(dir);
                panic!(
                    "{}",
                    Error::DirectoryIndexOutOfRange {
                        index: dir_index,
                        len,
                    }
                );
            }
        }
    }

    /// Number of distinct buckets.
    pub fn num_buckets(&self) -> usize {
        self.dir.lock().buckets.len()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.dir.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity of each bucket.
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Structural-change statistics.
    pub fn stats(&self) -> &HashTableStats {
        &self.stats
    }
}

impl<K, V, S> fmt::Debug for ExtendibleHashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self.dir.lock();
        f.debug_struct("ExtendibleHashTable")
            .field("bucket_size", &self.bucket_size)
            .field("global_depth", &dir.global_depth)
            .field("num_buckets", &dir.buckets.len())
            .field("len", &dir.len)
            .finish_non_exhaustive()
    }
}
