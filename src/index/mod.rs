//! Index structures.
//!
//! - [`hash`] - Extendible hash table used for the buffer pool's page table

pub mod hash;
