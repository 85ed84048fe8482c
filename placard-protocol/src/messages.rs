//! Tile-originated records: the hello and the three fixed-size replies.

use crate::wire::{FailureCode, ACK, NAK, SYN, TIMING_REPORT};

/// Firmware revision pair reported in every hello
pub const PROTOCOL_REVISION: (u8, u8) = (0, 23);

/// Status-byte bits carried in the hello
///
/// The reset-cause bits let the server distinguish a freshly powered tile
/// from one that is retrying after a watchdog restart.
pub mod status {
    /// Application button was pressed (or held at hello time)
    pub const APP_BUTTON: u8 = 1 << 0;
    /// Previous restart was a watchdog reset
    pub const WOKE_WATCHDOG: u8 = 1 << 5;
    /// Previous restart was the reset button
    pub const WOKE_BUTTON_RESET: u8 = 1 << 6;
    /// Previous restart was a true power-on
    pub const WOKE_POWER_ON: u8 = 1 << 7;
}

/// Length of an encoded hello record
pub const HELLO_LEN: usize = 7;

/// Length of every encoded tile reply
pub const REPLY_LEN: usize = 3;

/// The session-opening record the tile sends after waking the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hello {
    /// Capacitor voltage, 8-bit left-justified sample
    pub cap_voltage: u8,
    /// Button / reset-cause bits, see [`status`]
    pub button_status: u8,
    /// Sequence number of the last packet fully received in the previous
    /// session (0xFF when no packet has ever been received)
    pub last_received: u8,
    /// Sign-corrected temperature sample, 0 when no sensor is fitted
    pub temperature: u8,
}

impl Hello {
    pub fn to_bytes(&self) -> [u8; HELLO_LEN] {
        let (rev_high, rev_low) = PROTOCOL_REVISION;
        [
            SYN,
            rev_high,
            rev_low,
            self.cap_voltage,
            self.button_status,
            self.last_received,
            self.temperature,
        ]
    }
}

/// A tile reply; all three variants encode to exactly three bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Transfer applied in full
    Ack,
    /// Transfer abandoned; carries the last good sequence and a reason
    Nak {
        last_received: u8,
        code: FailureCode,
    },
    /// Poll-loop iterations until the server's first reply byte appeared.
    /// Diagnostic only; the server uses it to tune its own pacing.
    TimingReport(u16),
}

impl Reply {
    pub fn to_bytes(&self) -> [u8; REPLY_LEN] {
        match *self {
            Reply::Ack => [ACK, 0, 0],
            Reply::Nak {
                last_received,
                code,
            } => [NAK, last_received, code.as_byte()],
            Reply::TimingReport(polls) => [TIMING_REPORT, (polls >> 8) as u8, polls as u8],
        }
    }
}
