//! Exponential retry backoff
//!
//! Every failed session attempt - including the ones that end in a
//! watchdog restart - stretches the delay before the next try. Success
//! snaps the delay back to a moderate floor rather than zero, so a tile
//! whose server just vanished does not chew through its capacitor.

use placard_protocol::SleepSpec;

/// Largest usable backoff exponent (the secondary prescaler's ceiling)
pub const MAX_BACKOFF_EXPONENT: u8 = 11;

/// Where retries ramp from after the first sleep; roughly a 2 second delay
pub const INITIAL_BACKOFF_EXPONENT: u8 = 4;

/// Retry pacing state; the one piece of state worth keeping across
/// watchdog restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Backoff {
    exponent: u8,
}

impl Backoff {
    /// Start from a given exponent: 0 after a power-on or button reset so
    /// the first attempt is nearly immediate, or the retained value after a
    /// watchdog restart.
    pub fn new(exponent: u8) -> Self {
        Self { exponent }
    }

    /// Current exponent, clamped to the usable range
    pub fn exponent(&self) -> u8 {
        self.exponent.min(MAX_BACKOFF_EXPONENT)
    }

    /// The delay to sleep before the next attempt
    pub fn delay(&self) -> SleepSpec {
        SleepSpec::new(1, self.exponent())
    }

    /// Account for a consumed delay: grow towards the cap, then hold the
    /// floor so post-reset retries ramp from a moderate delay instead of
    /// zero.
    pub fn ramp(&mut self) {
        self.exponent = (self.exponent() + 1)
            .min(MAX_BACKOFF_EXPONENT)
            .max(INITIAL_BACKOFF_EXPONENT);
    }

    /// A session succeeded; fall back to the initial pacing.
    pub fn reset(&mut self) {
        self.exponent = INITIAL_BACKOFF_EXPONENT;
    }
}
