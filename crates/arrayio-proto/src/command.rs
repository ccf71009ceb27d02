//! Remote array commands and opcode packing
//!
//! On the wire an operation is a single bit-packed `u32`: the command in
//! the low 6 bits, the disk selector in bits 20-23, the block selector in
//! bits 24-31. The packed form exists only at the wire boundary; everywhere
//! else an operation travels as an [`Opcode`].

use crate::frame::FrameError;
use arrayio_common::{BlockNum, DiskId};

const COMMAND_MASK: u32 = 0x3f;
const DISK_SHIFT: u32 = 20;
const DISK_MASK: u32 = 0xf;
const BLOCK_SHIFT: u32 = 24;
const BLOCK_MASK: u32 = 0xff;

/// Commands understood by the remote array
///
/// The array keeps a current-disk/current-block cursor across calls, which
/// is why the seek commands exist at all: every block read or write acts on
/// wherever the cursor points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    Mount = 0,
    Unmount = 1,
    SeekToDisk = 2,
    SeekToBlock = 3,
    ReadBlock = 4,
    WriteBlock = 5,
}

impl Command {
    fn from_wire(raw: u32) -> Result<Self, FrameError> {
        match raw & COMMAND_MASK {
            0 => Ok(Self::Mount),
            1 => Ok(Self::Unmount),
            2 => Ok(Self::SeekToDisk),
            3 => Ok(Self::SeekToBlock),
            4 => Ok(Self::ReadBlock),
            5 => Ok(Self::WriteBlock),
            _ => Err(FrameError::UnknownCommand(raw)),
        }
    }
}

/// One remote operation, with its optional disk and block selectors
///
/// Selectors left as `None` pack to zero. Unpacking always yields `Some`
/// for both selectors since the wire fields are always present; compare
/// opcodes through [`Opcode::pack`] when wire identity matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub command: Command,
    pub disk: Option<DiskId>,
    pub block: Option<BlockNum>,
}

impl Opcode {
    /// An operation with no selectors (mount, unmount, block read/write)
    #[must_use]
    pub const fn bare(command: Command) -> Self {
        Self {
            command,
            disk: None,
            block: None,
        }
    }

    /// Seek the remote cursor to the given disk
    #[must_use]
    pub const fn seek_to_disk(disk: DiskId) -> Self {
        Self {
            command: Command::SeekToDisk,
            disk: Some(disk),
            block: None,
        }
    }

    /// Seek the remote cursor to the given block of the current disk
    #[must_use]
    pub const fn seek_to_block(block: BlockNum) -> Self {
        Self {
            command: Command::SeekToBlock,
            disk: None,
            block: Some(block),
        }
    }

    /// Pack into the wire representation
    #[must_use]
    pub fn pack(&self) -> u32 {
        let disk = self.disk.map_or(0, DiskId::get);
        let block = self.block.map_or(0, BlockNum::get);
        (self.command as u32) | (u32::from(disk) << DISK_SHIFT) | (u32::from(block) << BLOCK_SHIFT)
    }

    /// Unpack from the wire representation
    ///
    /// The 4-bit disk field cannot exceed the array size, so only an
    /// unknown command value can fail here.
    pub fn unpack(raw: u32) -> Result<Self, FrameError> {
        let command = Command::from_wire(raw)?;
        let disk = ((raw >> DISK_SHIFT) & DISK_MASK) as u8;
        let block = ((raw >> BLOCK_SHIFT) & BLOCK_MASK) as u8;
        Ok(Self {
            command,
            disk: Some(DiskId::new_unchecked(disk)),
            block: Some(BlockNum::from(block)),
        })
    }
}
