//! Error types for framecache.
//!
//! Two kinds of failure exist in this crate:
//! - Caller-contract violations (bad frame id, removing a pinned frame).
//!   These are bugs in the caller, so the public operations panic with the
//!   `Display` text of the matching [`Error`] variant.
//! - Expected negative outcomes (nothing to evict, key not found). These are
//!   ordinary `Option`/`bool` results and never show up here.
//!
//! [`Error`] values are only *returned* from fallible construction
//! (`try_new`) and from diagnostic checks such as
//! [`ExtendibleHashTable::verify_integrity`](crate::index::hash::ExtendibleHashTable::verify_integrity).

use thiserror::Error;

use crate::common::FrameId;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors produced by framecache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Frame id outside the range the replacer was built for.
    #[error("invalid frame id {frame_id}: replacer tracks {num_frames} frames")]
    InvalidFrameId { frame_id: FrameId, num_frames: usize },

    /// Attempted to remove a frame that is still pinned.
    #[error("cannot remove non-evictable {0}")]
    FrameNotEvictable(FrameId),

    /// A constructor parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Directory slot lookup past the end of the directory.
    #[error("directory index {index} out of range (directory has {len} slots)")]
    DirectoryIndexOutOfRange { index: usize, len: usize },

    /// A structural invariant of the hash index does not hold.
    #[error("hash index corrupted: {0}")]
    Corrupted(String),
}
