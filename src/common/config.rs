//! Configuration defaults for framecache.
//!
//! Both components take plain scalar constructor parameters. These constants
//! are the values a buffer pool uses when it has no reason to pick others.

/// Default LRU-K history depth.
///
/// A frame needs this many accesses before it leaves the cold list.
/// Matches BusTub's `LRUK_REPLACER_K`.
pub const DEFAULT_REPLACER_K: usize = 10;

/// Default bucket capacity for the page table's extendible hash index.
pub const DEFAULT_BUCKET_SIZE: usize = 4;

/// Smallest accepted `k`. With `k == 1` every frame is hot from its first
/// access and the replacer degenerates to plain LRU.
pub const MIN_REPLACER_K: usize = 1;

/// Smallest accepted bucket capacity.
pub const MIN_BUCKET_SIZE: usize = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_limits() {
        assert!(DEFAULT_REPLACER_K >= MIN_REPLACER_K);
        assert!(DEFAULT_BUCKET_SIZE >= MIN_BUCKET_SIZE);
    }
}
