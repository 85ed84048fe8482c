//! Tile <-> base station radio protocol
//!
//! This crate defines the byte-level protocol spoken between a Placard tile
//! and its base station over the half-duplex serial radio. The tile always
//! opens the conversation; the server answers with a stream of framed
//! packets addressed at display memory.
//!
//! # Session shape
//!
//! ```text
//! tile:   SYN rev_hi rev_lo voltage status last_seq temperature
//! tile:   TIMING_REPORT hi lo
//! server: STX seq len payload...            (repeated)
//! server: ETX seq len payload... count exp  (final frame + sleep order)
//! tile:   ACK 0 0
//! ```
//!
//! The server may instead answer `CAN count exp` to cancel the session and
//! put the tile straight back to sleep. The tile answers a malformed or
//! overrun stream with `NAK last_seq failure_code` and gives up; retry
//! pacing is the controller's problem, not the protocol's.
//!
//! Packets carry a per-session sequence number starting at 0. A packet
//! received out of sequence is consumed but never reaches the display; the
//! radio layer below this protocol acknowledges per-hop delivery, so the
//! server notices the gap and resends from the lost packet.

#![no_std]
#![deny(unsafe_code)]

pub mod messages;
pub mod sleep;
pub mod wire;

pub use messages::{Hello, Reply, PROTOCOL_REVISION};
pub use sleep::{SleepSpec, MAX_SLEEP_EXPONENT};
pub use wire::{FailureCode, FrameHeader};
