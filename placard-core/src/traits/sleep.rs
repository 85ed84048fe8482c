//! Low-power sleep hardware.

/// Prescaler configuration for one run of sleep units
///
/// The underlying timer chains two prescaler stages. The primary stage is
/// either bypassed or run at its maximum ratio (covering 2^7 of the
/// requested exponent); the secondary stage carries the rest, up to 2^11.
/// [`crate::scheduler::split_exponent`] produces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleepStages {
    /// Run the primary prescaler at its maximum ratio
    pub primary_max: bool,
    /// Secondary prescaler exponent, 0..=11
    pub secondary: u8,
}

/// Interruptible low-power sleep primitive
pub trait SleepTimer {
    /// Latch the prescaler stages for subsequent sleep units.
    fn configure(&mut self, stages: SleepStages);

    /// Sleep for one configured unit. Returns on timer expiry *or* on an
    /// external signal change (button); callers deliberately cannot tell
    /// the two apart - any wake is a fine moment to re-poll.
    fn sleep_one_unit(&mut self);
}
