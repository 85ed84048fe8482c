//! The retained-state boundary
//!
//! A watchdog reset is this firmware's timeout mechanism, and it is
//! destructive: no unwind, no handler, the whole device restarts. The two
//! bytes here are exactly what the next boot needs to carry on sensibly -
//! nothing else survives on purpose. Session state never belongs in here.

use placard_protocol::messages::status;

/// State that must outlive a watchdog reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetainedState {
    /// Current backoff exponent, [0, 11]
    pub backoff_exponent: u8,
    /// Sequence number of the last packet fully received, reported in the
    /// next hello so the server knows how far the previous session got
    pub last_sequence: u8,
}

impl Default for RetainedState {
    /// The state of a factory-fresh tile: no pending backoff, no packet
    /// ever received (0xFF is sequence "minus one").
    fn default() -> Self {
        Self {
            backoff_exponent: 0,
            last_sequence: 0xFF,
        }
    }
}

/// Why the firmware is starting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetCause {
    /// True power-on: retained memory is garbage
    PowerOn,
    /// Reset button / external reset line: memory intact, but the user
    /// wants action now, so pacing restarts from zero
    ButtonReset,
    /// Watchdog fired: memory intact, pacing continues where it left off
    Watchdog,
}

impl ResetCause {
    /// The hello status bit advertising this cause to the server
    pub fn status_bit(self) -> u8 {
        match self {
            ResetCause::PowerOn => status::WOKE_POWER_ON,
            ResetCause::ButtonReset => status::WOKE_BUTTON_RESET,
            ResetCause::Watchdog => status::WOKE_WATCHDOG,
        }
    }

    /// Does retained memory survive this kind of reset?
    pub fn retains_memory(self) -> bool {
        !matches!(self, ResetCause::PowerOn)
    }
}

/// Backing storage for [`RetainedState`]
///
/// On hardware this is a magic-tagged RAM block the watchdog reset leaves
/// alone; saving must be cheap enough to do after every state change.
pub trait RetainedStore {
    /// Read back the last saved state, or `None` when the block is missing
    /// or fails validation.
    fn load(&mut self) -> Option<RetainedState>;

    /// Persist the state.
    fn save(&mut self, state: &RetainedState);
}
