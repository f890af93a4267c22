//! Common types shared across framecache.
//!
//! - Configuration defaults and limits
//! - Identifiers (FrameId, PageId)

pub mod config;
mod frame_id;
mod page_id;

pub use crate::error::{Error, Result};
pub use frame_id::FrameId;
pub use page_id::PageId;
