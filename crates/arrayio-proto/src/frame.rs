//! Request/response framing
//!
//! Every frame starts with a fixed 8-byte header, all fields network byte
//! order:
//!
//! ```text
//! offset  size  field
//! 0       2     total frame length (8, or 8 + 256)
//! 2       4     packed opcode
//! 6       2     status (0 in requests; remote result code in responses)
//! 8       0|256 block payload, present iff length says so
//! ```
//!
//! A request carries a payload only for a write-block command; a response
//! carries one only for a read-block result. The codec performs exactly
//! the stream reads it needs and never retries.

use crate::command::{Command, Opcode};
use arrayio_common::BLOCK_SIZE;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::{self, Read, Write};
use thiserror::Error;

/// Size of the frame header in bytes
pub const HEADER_LEN: usize = 8;

/// Total size of a frame that carries a block payload
pub const PAYLOAD_FRAME_LEN: usize = HEADER_LEN + BLOCK_SIZE;

/// Framing error
#[derive(Debug, Error)]
pub enum FrameError {
    /// The stream ended before a full frame was delivered
    #[error("transport closed mid-frame")]
    Truncated,

    /// Transport I/O error
    #[error("frame I/O error: {0}")]
    Io(#[from] io::Error),

    /// The header length field matches no legal frame size
    #[error("frame length {0} matches no legal frame size")]
    BadLength(u16),

    /// The opcode's command bits identify no known command
    #[error("unknown command in opcode {0:#010x}")]
    UnknownCommand(u32),
}

fn short_io(err: io::Error) -> FrameError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero => FrameError::Truncated,
        _ => FrameError::Io(err),
    }
}

/// One complete wire frame: header plus optional block payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub status: u16,
    pub payload: Option<Bytes>,
}

impl Frame {
    /// Build a request frame for `op`
    ///
    /// The payload is attached only when the command is a block write;
    /// for every other command it is dropped, matching the wire rule that
    /// only write-block requests carry data.
    #[must_use]
    pub fn request(op: Opcode, payload: Option<&[u8; BLOCK_SIZE]>) -> Self {
        let payload = payload
            .filter(|_| op.command == Command::WriteBlock)
            .map(|block| Bytes::copy_from_slice(block));
        Self {
            opcode: op,
            status: 0,
            payload,
        }
    }

    /// Build a response frame echoing `op` with the given result status
    #[must_use]
    pub fn response(op: Opcode, status: u16, payload: Option<&[u8; BLOCK_SIZE]>) -> Self {
        Self {
            opcode: op,
            status,
            payload: payload.map(|block| Bytes::copy_from_slice(block)),
        }
    }

    /// Total encoded length of this frame in bytes
    #[must_use]
    pub fn wire_len(&self) -> usize {
        if self.payload.is_some() {
            PAYLOAD_FRAME_LEN
        } else {
            HEADER_LEN
        }
    }

    /// Encode into a contiguous byte buffer
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let len = self.wire_len();
        let mut frame = BytesMut::with_capacity(len);
        frame.put_u16(len as u16);
        frame.put_u32(self.opcode.pack());
        frame.put_u16(self.status);
        if let Some(payload) = &self.payload {
            frame.put_slice(payload);
        }
        frame.freeze()
    }

    /// Write the encoded frame to `w`, delivering every byte or failing
    pub fn write_to(&self, w: &mut impl Write) -> Result<(), FrameError> {
        w.write_all(&self.encode()).map_err(short_io)?;
        w.flush().map_err(short_io)
    }

    /// Decode one frame from `r`
    ///
    /// Reads exactly 8 header bytes; iff the decoded length indicates a
    /// payload, reads exactly 256 more. A stream that yields fewer bytes
    /// than requested before closing produces [`FrameError::Truncated`].
    pub fn decode(r: &mut impl Read) -> Result<Self, FrameError> {
        let mut header = [0u8; HEADER_LEN];
        r.read_exact(&mut header).map_err(short_io)?;

        let len = u16::from_be_bytes([header[0], header[1]]);
        let raw_op = u32::from_be_bytes([header[2], header[3], header[4], header[5]]);
        let status = u16::from_be_bytes([header[6], header[7]]);
        let opcode = Opcode::unpack(raw_op)?;

        let payload = match len as usize {
            HEADER_LEN => None,
            PAYLOAD_FRAME_LEN => {
                let mut block = [0u8; BLOCK_SIZE];
                r.read_exact(&mut block).map_err(short_io)?;
                Some(Bytes::copy_from_slice(&block))
            }
            _ => return Err(FrameError::BadLength(len)),
        };

        Ok(Self {
            opcode,
            status,
            payload,
        })
    }
}
