//! ArrayIO Client - remote array round trips
//!
//! One blocking request/response round trip per call against the remote
//! disk array. The transport is any blocking duplex byte stream; a
//! `TcpStream` reaches a live array, and tests drive an in-process
//! emulator through the same interface.
//!
//! The client is deliberately thin: it frames one command, delivers it in
//! full, reads back exactly one response frame, and hands the remote
//! status code to the caller untouched. Interpreting that status is the
//! caller's concern, and nothing here retries.

use arrayio_common::BLOCK_SIZE;
use arrayio_proto::{Frame, FrameError, Opcode};
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use thiserror::Error;
use tracing::debug;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Remote operation client error
#[derive(Debug, Error)]
pub enum ClientError {
    /// No stream is attached; no I/O was attempted
    #[error("no active connection to the remote array")]
    NotConnected,

    /// Dialing the remote array failed
    #[error("failed to reach the remote array: {0}")]
    Connect(#[source] io::Error),

    /// The request or response frame could not be delivered intact
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Client for the remote disk array service
///
/// Owns at most one connection. Calls made while disconnected fail
/// immediately with [`ClientError::NotConnected`] before any I/O.
pub struct ArrayClient<S> {
    stream: Option<S>,
}

impl ArrayClient<TcpStream> {
    /// Dial the remote array over TCP
    pub fn connect(addr: impl ToSocketAddrs) -> ClientResult<Self> {
        let stream = TcpStream::connect(addr).map_err(ClientError::Connect)?;
        Ok(Self::attach(stream))
    }
}

impl<S: Read + Write> ArrayClient<S> {
    /// Wrap an already-connected duplex stream
    pub fn attach(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// Drop the connection; later calls fail with `NotConnected`
    pub fn disconnect(&mut self) {
        self.stream = None;
    }

    /// Whether a connection is currently attached
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Perform one request/response round trip
    ///
    /// `payload` rides along for write-block commands; a response payload
    /// is copied into `read_buf` when the caller supplied one. Returns the
    /// remote status code verbatim.
    pub fn execute(
        &mut self,
        op: Opcode,
        payload: Option<&[u8; BLOCK_SIZE]>,
        read_buf: Option<&mut [u8; BLOCK_SIZE]>,
    ) -> ClientResult<u16> {
        let stream = self.stream.as_mut().ok_or(ClientError::NotConnected)?;

        Frame::request(op, payload).write_to(stream)?;
        let response = Frame::decode(stream)?;

        if let (Some(out), Some(data)) = (read_buf, response.payload.as_ref()) {
            out.copy_from_slice(data);
        }

        debug!(
            command = ?op.command,
            status = response.status,
            "remote round trip"
        );
        Ok(response.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrayio_proto::Command;
    use std::io::Cursor;

    /// Duplex stub: reads come from a pre-scripted buffer, writes are kept
    /// for inspection.
    struct ScriptedStream {
        input: Cursor<Vec<u8>>,
        written: Vec<u8>,
    }

    impl ScriptedStream {
        fn replying(frames: &[Frame]) -> Self {
            let mut input = Vec::new();
            for frame in frames {
                input.extend_from_slice(&frame.encode());
            }
            Self {
                input: Cursor::new(input),
                written: Vec::new(),
            }
        }
    }

    impl Read for ScriptedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for ScriptedStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_not_connected_fails_without_io() {
        let mut client: ArrayClient<ScriptedStream> =
            ArrayClient::attach(ScriptedStream::replying(&[]));
        client.disconnect();
        assert!(!client.is_connected());
        let err = client
            .execute(Opcode::bare(Command::Mount), None, None)
            .unwrap_err();
        assert!(matches!(err, ClientError::NotConnected));
    }

    #[test]
    fn test_round_trip_returns_status() {
        let op = Opcode::bare(Command::Mount);
        let mut client = ArrayClient::attach(ScriptedStream::replying(&[Frame::response(
            op, 0, None,
        )]));
        let status = client.execute(op, None, None).unwrap();
        assert_eq!(status, 0);

        let stream = client.stream.take().unwrap();
        assert_eq!(stream.written, Frame::request(op, None).encode());
    }

    #[test]
    fn test_response_payload_copied_out() {
        let mut block = [0u8; BLOCK_SIZE];
        for (i, byte) in block.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let op = Opcode::bare(Command::ReadBlock);
        let mut client = ArrayClient::attach(ScriptedStream::replying(&[Frame::response(
            op,
            0,
            Some(&block),
        )]));

        let mut out = [0u8; BLOCK_SIZE];
        let status = client.execute(op, None, Some(&mut out)).unwrap();
        assert_eq!(status, 0);
        assert_eq!(out, block);
    }

    #[test]
    fn test_short_response_is_framing_error() {
        let op = Opcode::bare(Command::ReadBlock);
        let mut stream = ScriptedStream::replying(&[Frame::response(op, 0, None)]);
        stream.input.get_mut().truncate(3);
        let mut client = ArrayClient::attach(stream);

        let err = client.execute(op, None, None).unwrap_err();
        assert!(matches!(err, ClientError::Frame(FrameError::Truncated)));
    }

    #[test]
    fn test_nonzero_status_passes_through() {
        let op = Opcode::bare(Command::Unmount);
        let mut client = ArrayClient::attach(ScriptedStream::replying(&[Frame::response(
            op, 7, None,
        )]));
        assert_eq!(client.execute(op, None, None).unwrap(), 7);
    }
}
