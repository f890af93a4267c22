//! Extendible hashing.
//!
//! - [`ExtendibleHashTable`] - Directory-of-buckets hash map that grows by
//!   splitting one bucket at a time
//! - [`HashTableStats`] - Split and doubling counters

mod bucket;
mod extendible_hash_table;
mod stats;

pub use extendible_hash_table::ExtendibleHashTable;
pub use stats::{HashTableStats, HashTableStatsSnapshot};
