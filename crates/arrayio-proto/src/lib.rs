//! ArrayIO Protocol - remote array wire format
//!
//! This crate contains the command vocabulary of the remote disk array and
//! the request/response framing used to carry one command per round trip
//! over a byte stream.

pub mod command;
pub mod frame;

pub use command::{Command, Opcode};
pub use frame::{Frame, FrameError, HEADER_LEN, PAYLOAD_FRAME_LEN};
