//! framecache - buffer-management building blocks for a disk-based storage engine.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │               Buffer Pool Manager (not in this crate)           │
//! │        pin / unpin / fetch / flush, page table, disk I/O        │
//! └───────────────┬───────────────────────────────┬─────────────────┘
//!                 │ which frame to evict?          │ which frame holds page P?
//!                 ↓                                ↓
//! ┌───────────────────────────────┐ ┌───────────────────────────────┐
//! │  buffer::replacer             │ │  index::hash                  │
//! │  LruKReplacer                 │ │  ExtendibleHashTable<K, V>    │
//! │  cold list (< k accesses)     │ │  directory of 2^global_depth  │
//! │  hot list  (>= k, LRU order)  │ │  slots → split-on-overflow    │
//! └───────────────────────────────┘ │  buckets                      │
//!                                   └───────────────────────────────┘
//! ```
//!
//! The two components are independent. Each guards its state with a single
//! internal lock, so both can be shared across threads behind an `Arc`.
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, config)
//! - [`error`] - Error type
//! - [`buffer`] - Frame replacement
//! - [`index`] - Extendible hash index
//!
//! # Quick Start
//! ```
//! use framecache::{FrameId, LruKReplacer, PageId, PageTable};
//!
//! let replacer = LruKReplacer::new(16, 2);
//! let page_table = PageTable::new(4);
//!
//! page_table.insert(PageId::new(7), FrameId::new(0));
//! replacer.record_access(FrameId::new(0));
//!
//! assert_eq!(page_table.find(&PageId::new(7)), Some(FrameId::new(0)));
//! assert_eq!(replacer.evict(), Some(FrameId::new(0)));
//! ```

pub mod buffer;
pub mod common;
pub mod error;
pub mod index;

pub use buffer::replacer::{LruKReplacer, Replacer};
pub use buffer::{ReplacerStats, ReplacerStatsSnapshot};
pub use common::{Error, FrameId, PageId, Result};
pub use index::hash::{ExtendibleHashTable, HashTableStats, HashTableStatsSnapshot};

/// Page id → frame id mapping a buffer pool keeps for resident pages.
pub type PageTable = ExtendibleHashTable<PageId, FrameId>;
