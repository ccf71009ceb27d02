//! ArrayIO Block - volume engine and block cache
//!
//! This crate presents a flat byte-addressable volume whose data lives on
//! a remote array of fixed-size disks, reached one command at a time over
//! a stateful wire protocol.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐
//! │    Caller     │  read(addr, buf) / write(addr, buf)
//! └───────┬───────┘
//!         │
//! ┌───────▼───────┐      ┌────────────┐
//! │ Volume engine │─────▶│ BlockCache │  (disk, block) → 256 B, LRU
//! └───────┬───────┘      └────────────┘
//!         │ cache miss / block flush
//! ┌───────▼───────┐
//! │  ArrayClient  │  one frame out, one frame in
//! └───────────────┘
//! ```
//!
//! The engine walks a byte range block by block, consulting the cache
//! before touching the wire, and drives the remote cursor with explicit
//! seeks since the array keeps per-connection disk/block state.

pub mod addr;
pub mod cache;
pub mod error;
pub mod volume;

pub use addr::{BlockSpan, block_spans};
pub use cache::{BlockCache, CacheStats, MAX_CACHE_ENTRIES, MIN_CACHE_ENTRIES};
pub use error::{VolumeError, VolumeResult};
pub use volume::Volume;
