//! Buffer management building blocks.
//!
//! # Components
//! - [`replacer`] - Eviction policies ([`LruKReplacer`](replacer::LruKReplacer))
//! - [`ReplacerStats`] - Replacer statistics

pub mod replacer;
mod stats;

pub use stats::{ReplacerStats, ReplacerStatsSnapshot};
