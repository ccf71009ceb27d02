//! Core type definitions for ArrayIO
//!
//! The remote array has a fixed geometry: a small number of equally sized
//! disks, each subdivided into fixed-size blocks. Every byte of the flat
//! volume address space maps to exactly one (disk, block, offset) triple.

use derive_more::{Display, From, Into};
use thiserror::Error;

/// Number of disks in the remote array
pub const NUM_DISKS: usize = 16;

/// Size of one disk in bytes
pub const DISK_SIZE: usize = 65536;

/// Size of one block in bytes (unit of remote transfer and caching)
pub const BLOCK_SIZE: usize = 256;

/// Blocks per disk
pub const BLOCKS_PER_DISK: usize = DISK_SIZE / BLOCK_SIZE;

/// Total size of the volume address space in bytes
pub const VOLUME_BYTES: usize = NUM_DISKS * DISK_SIZE;

/// Largest byte range a single read or write call may cover
pub const MAX_IO_BYTES: usize = 1028;

/// Error for a raw disk index outside the array geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("disk index {0} out of range (array has 16 disks)")]
pub struct InvalidDiskId(pub u8);

/// Identifier of one disk in the array
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Into)]
#[display("{_0}")]
pub struct DiskId(u8);

impl DiskId {
    /// Create a disk id, validating it against the array geometry
    pub fn new(raw: u8) -> Result<Self, InvalidDiskId> {
        if (raw as usize) < NUM_DISKS {
            Ok(Self(raw))
        } else {
            Err(InvalidDiskId(raw))
        }
    }

    /// Create without validation (for values already masked to 4 bits)
    #[must_use]
    pub const fn new_unchecked(raw: u8) -> Self {
        Self(raw)
    }

    /// Get the raw disk index
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Block index within a disk
///
/// Every `u8` is a valid block number: a disk holds exactly 256 blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0}")]
pub struct BlockNum(u8);

impl BlockNum {
    /// Get the raw block index
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}
