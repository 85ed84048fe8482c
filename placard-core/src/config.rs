//! Tuning constants
//!
//! Everything here was chosen empirically on real hardware. The values are
//! carried as data rather than buried in the code so a board variant can
//! override them at construction time.

use placard_protocol::SleepSpec;

/// Controller tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuning {
    /// Minimum capacitor reading at which a radio transmission is reliable.
    /// 92 is about 1.09 V. Transmitting below this wastes more charge than
    /// it could ever deliver, and worse, keeps the capacitor pinned below
    /// the level where transmissions start working again.
    pub radio_voltage_floor: u8,

    /// Inactivity window on in-session receives, in milliseconds. Measured
    /// round trips never exceed 62 ms, but windows tuned close to that
    /// produce a storm of watchdog resets and almost no good sessions.
    /// Something doesn't add up; 130 ms works. Do not shave this without a
    /// long soak test.
    pub reply_watchdog_ms: u16,

    /// Sleep taken instead of a session when the capacitor is too flat:
    /// 142 units at exponent 13 is roughly 20 minutes of recharge time.
    pub recharge_sleep: SleepSpec,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            radio_voltage_floor: 92,
            reply_watchdog_ms: 130,
            recharge_sleep: SleepSpec::new(142, 13),
        }
    }
}
