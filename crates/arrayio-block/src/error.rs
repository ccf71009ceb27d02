//! Volume error types

use arrayio_client::ClientError;
use arrayio_common::{BlockNum, DiskId, InvalidDiskId};
use arrayio_proto::Command;
use thiserror::Error;

/// Volume operation error
#[derive(Debug, Error)]
pub enum VolumeError {
    /// The byte range runs past the end of the volume
    #[error("address {addr} + length {len} exceeds volume size {size}")]
    OutOfBounds { addr: u32, len: usize, size: usize },

    /// The byte range exceeds the single-call transfer limit
    #[error("request length {len} exceeds the {max}-byte single-call limit")]
    RequestTooLarge { len: usize, max: usize },

    /// Cache capacity outside the supported range
    #[error("cache capacity {0} outside supported range 2..=4096")]
    InvalidCapacity(usize),

    /// An entry for this key is already cached
    #[error("cache entry for disk {disk} block {block} already present")]
    DuplicateCacheEntry { disk: DiskId, block: BlockNum },

    /// A raw disk index failed geometry validation
    #[error("invalid disk: {0}")]
    Geometry(#[from] InvalidDiskId),

    /// Transport or framing failure from the operation client
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The remote array reported a command failure
    #[error("remote {command:?} failed with status {status}")]
    RemoteOperation { command: Command, status: u16 },
}

/// Result type for volume operations
pub type VolumeResult<T> = Result<T, VolumeError>;
