//! Volume I/O engine
//!
//! Translates byte-range reads and writes into the ordered seek/read/write
//! command sequence the remote array understands, consulting the block
//! cache before touching the wire.
//!
//! The remote array keeps a current-disk/current-block cursor per
//! connection, and block reads move it, so the engine re-seeks the disk on
//! every boundary crossing and seeks the block before every remote block
//! operation it issues. One logical operation runs at a time; every remote
//! round trip blocks until its response frame arrives or the call fails.

use crate::addr::{self, BlockSpan};
use crate::cache::BlockCache;
use crate::error::{VolumeError, VolumeResult};
use arrayio_client::ArrayClient;
use arrayio_common::{BLOCK_SIZE, DiskId, VolumeConfig};
use arrayio_proto::{Command, Opcode};
use bytes::Bytes;
use std::io::{Read, Write};
use std::net::TcpStream;
use tracing::{debug, info};

/// Byte-addressable volume backed by the remote disk array
///
/// Owns the one operation client and the one block cache for its lifetime
/// (both are singletons by ownership, not by global state). All methods
/// take `&mut self`: overlapping logical operations are a caller bug the
/// borrow checker rejects outright.
pub struct Volume<S> {
    client: ArrayClient<S>,
    cache: BlockCache,
}

impl Volume<TcpStream> {
    /// Dial the configured remote array and build the volume around it
    pub fn connect(config: &VolumeConfig) -> VolumeResult<Self> {
        let client = ArrayClient::connect(config.remote.addr)?;
        let cache = BlockCache::new(config.cache.entries)?;
        Ok(Self::new(client, cache))
    }
}

impl<S: Read + Write> Volume<S> {
    /// Build a volume from an existing client and cache
    pub fn new(client: ArrayClient<S>, cache: BlockCache) -> Self {
        Self { client, cache }
    }

    /// Mount the remote array
    pub fn mount(&mut self) -> VolumeResult<()> {
        self.command(Opcode::bare(Command::Mount))?;
        info!("volume mounted");
        Ok(())
    }

    /// Unmount the remote array
    pub fn unmount(&mut self) -> VolumeResult<()> {
        self.command(Opcode::bare(Command::Unmount))?;
        info!("volume unmounted");
        Ok(())
    }

    /// Block cache, for capacity and hit-rate inspection
    #[must_use]
    pub fn cache(&self) -> &BlockCache {
        &self.cache
    }

    /// Read `buf.len()` bytes starting at volume address `addr`
    ///
    /// Returns the number of bytes read. A zero-length read is a
    /// successful no-op that issues no remote operation. On failure
    /// partway through, bytes already copied into `buf` stay there and
    /// no compensation is attempted.
    pub fn read(&mut self, addr: u32, buf: &mut [u8]) -> VolumeResult<usize> {
        addr::validate_range(addr, buf.len())?;
        if buf.is_empty() {
            return Ok(0);
        }
        debug!(addr, len = buf.len(), "volume read");

        let spans = addr::block_spans(addr, buf.len());
        let mut cursor = self.seek_to_start(&spans)?;

        for span in &spans {
            cursor = self.advance_disk(cursor, span)?;

            let data = match self.cache_lookup(span) {
                Some(hit) => hit,
                None => {
                    self.command(Opcode::seek_to_block(span.block))?;
                    let block = self.read_remote_block()?;
                    // A fresh remote read is the only path that populates
                    // the cache.
                    self.cache_insert(span, &block)?;
                    Bytes::copy_from_slice(&block)
                }
            };

            let start = span.offset_in_block;
            buf[span.buf_offset..span.buf_offset + span.len]
                .copy_from_slice(&data[start..start + span.len]);
        }
        Ok(buf.len())
    }

    /// Write `buf.len()` bytes starting at volume address `addr`
    ///
    /// Writes are sub-block: every touched block is first fetched in full
    /// (cache hit or remote read) so untouched bytes survive, then the
    /// caller's bytes are spliced in and the whole block is written back.
    /// A block fetched on a write-path miss is deliberately not inserted
    /// into the cache; only already-resident blocks are updated.
    pub fn write(&mut self, addr: u32, buf: &[u8]) -> VolumeResult<usize> {
        addr::validate_range(addr, buf.len())?;
        if buf.is_empty() {
            return Ok(0);
        }
        debug!(addr, len = buf.len(), "volume write");

        let spans = addr::block_spans(addr, buf.len());
        let mut cursor = self.seek_to_start(&spans)?;

        for span in &spans {
            cursor = self.advance_disk(cursor, span)?;

            let cached = self.cache_lookup(span);
            let was_cached = cached.is_some();
            let mut block = [0u8; BLOCK_SIZE];
            match cached {
                Some(data) => block.copy_from_slice(&data),
                None => {
                    self.command(Opcode::seek_to_block(span.block))?;
                    block = self.read_remote_block()?;
                }
            }

            block[span.offset_in_block..span.offset_in_block + span.len]
                .copy_from_slice(&buf[span.buf_offset..span.buf_offset + span.len]);

            // The fetch moved the remote block cursor, so position it
            // again before writing the spliced block back.
            self.command(Opcode::seek_to_block(span.block))?;
            self.write_remote_block(&block)?;

            if was_cached {
                self.cache.update(span.disk, span.block, &block);
            }
        }
        Ok(buf.len())
    }

    /// Seek the remote cursor to the first span's disk
    fn seek_to_start(&mut self, spans: &[BlockSpan]) -> VolumeResult<DiskId> {
        let disk = spans[0].disk;
        self.command(Opcode::seek_to_disk(disk))?;
        Ok(disk)
    }

    /// Re-seek when a span crosses onto the next disk
    fn advance_disk(&mut self, cursor: DiskId, span: &BlockSpan) -> VolumeResult<DiskId> {
        if span.disk == cursor {
            return Ok(cursor);
        }
        self.command(Opcode::seek_to_disk(span.disk))?;
        Ok(span.disk)
    }

    fn cache_lookup(&mut self, span: &BlockSpan) -> Option<Bytes> {
        if self.cache.is_enabled() {
            self.cache.lookup(span.disk, span.block)
        } else {
            None
        }
    }

    fn cache_insert(&mut self, span: &BlockSpan, block: &[u8; BLOCK_SIZE]) -> VolumeResult<()> {
        if self.cache.is_enabled() {
            self.cache.insert(span.disk, span.block, block)?;
        }
        Ok(())
    }

    /// Issue a command that moves no block data
    fn command(&mut self, op: Opcode) -> VolumeResult<()> {
        let status = self.client.execute(op, None, None)?;
        Self::check_status(op.command, status)
    }

    /// Read the block at the remote cursor
    fn read_remote_block(&mut self) -> VolumeResult<[u8; BLOCK_SIZE]> {
        let mut block = [0u8; BLOCK_SIZE];
        let op = Opcode::bare(Command::ReadBlock);
        let status = self.client.execute(op, None, Some(&mut block))?;
        Self::check_status(Command::ReadBlock, status)?;
        Ok(block)
    }

    /// Write a full block at the remote cursor
    fn write_remote_block(&mut self, block: &[u8; BLOCK_SIZE]) -> VolumeResult<()> {
        let op = Opcode::bare(Command::WriteBlock);
        let status = self.client.execute(op, Some(block), None)?;
        Self::check_status(Command::WriteBlock, status)
    }

    fn check_status(command: Command, status: u16) -> VolumeResult<()> {
        if status == 0 {
            Ok(())
        } else {
            Err(VolumeError::RemoteOperation { command, status })
        }
    }
}
