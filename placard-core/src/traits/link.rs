//! Radio link abstraction
//!
//! The link is a half-duplex byte pipe to the base station with three
//! properties the session engine leans on:
//!
//! - Receives are bounded by an *inactivity watchdog* rather than a
//!   conventional timeout. On real hardware the watchdog restarts the whole
//!   device, so a stalled [`RadioLink::recv_byte`] simply never returns;
//!   implementations with an ordinary timeout (hosts, tests) return
//!   [`LinkError::TimedOut`] instead, and the session turns that into a
//!   normal failure with the same backoff reaction.
//! - The receiver has a tiny hardware FIFO that keeps its last bytes across
//!   an overrun, so overrun state must be checkable independently of reads.
//! - The transceiver is powered down between sessions and needs explicit
//!   wake/sleep sequencing around each one.

/// Errors surfaced by a radio link implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// No byte arrived inside the inactivity window. Hardware
    /// implementations never return this; they restart the device instead.
    TimedOut,
}

/// Half-duplex serial radio used for one session at a time
pub trait RadioLink {
    /// Power the transceiver up; blocks through its settle time, after
    /// which the link is usable.
    fn wake(&mut self);

    /// Drain the transmit path, then power the transceiver down.
    fn sleep(&mut self);

    /// Send one byte, blocking until the output path accepts it.
    fn send_byte(&mut self, byte: u8);

    /// Receive one byte, blocking until it arrives. Each received byte
    /// feeds the inactivity watchdog.
    fn recv_byte(&mut self) -> Result<u8, LinkError>;

    /// Non-blocking poll: is a received byte already waiting?
    ///
    /// Implementations with an explicit timeout must eventually report
    /// `true` once the window has expired, so that the following
    /// `recv_byte` can surface [`LinkError::TimedOut`] instead of spinning.
    fn recv_ready(&mut self) -> bool;

    /// Check and clear the receiver-overrun condition.
    fn take_overrun(&mut self) -> bool;

    /// Arm or disarm the inactivity window around the data phase of a
    /// session.
    fn watchdog(&mut self, armed: bool);
}
