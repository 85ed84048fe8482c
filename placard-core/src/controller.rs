//! Backoff & session controller
//!
//! The outer loop of the firmware: sample the board, decide whether the
//! capacitor can afford a radio session, run one, and react - server-paced
//! sleep on success, exponential backoff on failure. The controller never
//! terminates; the firmware calls [`Controller::backoff_sleep`] once at
//! boot (a watchdog restart lands here with its pacing already retained)
//! and then [`Controller::step`] forever.
//!
//! ```text
//! boot ─ backoff sleep ─> Sense ─> Decide ─┬─> session ─┬ ok ─> server sleep ┐
//!                           ^              │            └ err ─> backoff ────┤
//!                           │              └─> recharge sleep ───────────────┤
//!                           └────────────────────────────────────────────────┘
//! ```

use placard_protocol::messages::status;
use placard_protocol::{Hello, SleepSpec};

use crate::backoff::Backoff;
use crate::config::Tuning;
use crate::retained::{ResetCause, RetainedState, RetainedStore};
use crate::scheduler;
use crate::session::{self, SessionError};
use crate::traits::{linearize, DisplaySink, RadioLink, Sensors, SleepTimer};

/// What one control cycle did; returned for the firmware to log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleReport {
    /// A session delivered data and ordered this sleep
    Served { sleep: SleepSpec },
    /// The server cancelled; slept as ordered anyway
    Cancelled { sleep: SleepSpec },
    /// Capacitor too flat to transmit; took the recharge nap
    Recharge,
    /// Session failed; took a backoff sleep
    Failed { error: SessionError },
}

/// The tile's top-level state machine
pub struct Controller<L, D, B, R> {
    link: L,
    display: D,
    board: B,
    store: R,
    tuning: Tuning,
    backoff: Backoff,
    last_sequence: u8,
    button_status: u8,
}

impl<L, D, B, R> Controller<L, D, B, R>
where
    L: RadioLink,
    D: DisplaySink,
    B: Sensors + SleepTimer,
    R: RetainedStore,
{
    /// Build the controller from the reset cause and whatever retained
    /// state survived it
    pub fn new(
        link: L,
        display: D,
        board: B,
        mut store: R,
        cause: ResetCause,
        tuning: Tuning,
    ) -> Self {
        let retained = if cause.retains_memory() {
            store.load()
        } else {
            None
        };
        let retained = retained.unwrap_or_default();

        // Only a watchdog restart keeps ramping; a person at the reset
        // button wants a retry right now.
        let backoff = match cause {
            ResetCause::Watchdog => Backoff::new(retained.backoff_exponent),
            ResetCause::PowerOn | ResetCause::ButtonReset => Backoff::new(0),
        };

        Self {
            link,
            display,
            board,
            store,
            tuning,
            backoff,
            last_sequence: retained.last_sequence,
            button_status: cause.status_bit(),
        }
    }

    /// The boot/retry delay: sleep for the current backoff, then ramp it
    /// and persist - so that if the *next* attempt dies in a watchdog
    /// reset, the following boot already paces itself correctly.
    pub fn backoff_sleep(&mut self) {
        scheduler::run(&mut self.board, self.backoff.delay());
        self.backoff.ramp();
        self.persist();
    }

    /// One full Sense -> Decide -> React cycle
    pub fn step(&mut self) -> CycleReport {
        // Sense
        let cap_voltage = self.board.capacitor_voltage();
        let temperature = linearize(self.board.temperature());

        // Decide: transmitting from a flat capacitor wastes more charge
        // than it delivers and keeps the voltage pinned under the level
        // where sends start working, so stay quiet and recharge.
        if cap_voltage < self.tuning.radio_voltage_floor {
            let sleep = self.tuning.recharge_sleep;
            self.settle_success();
            scheduler::run(&mut self.board, sleep);
            return CycleReport::Recharge;
        }

        if self.board.button_pressed() {
            self.button_status |= status::APP_BUTTON;
        }
        let hello = Hello {
            cap_voltage,
            button_status: core::mem::take(&mut self.button_status),
            last_received: self.last_sequence,
            temperature,
        };

        // React
        match session::run(&mut self.link, &mut self.display, &hello) {
            Ok(outcome) => {
                self.last_sequence = outcome.last_sequence;
                self.settle_success();
                scheduler::run(&mut self.board, outcome.sleep);
                if outcome.cancelled {
                    CycleReport::Cancelled {
                        sleep: outcome.sleep,
                    }
                } else {
                    CycleReport::Served {
                        sleep: outcome.sleep,
                    }
                }
            }
            Err(failure) => {
                self.last_sequence = failure.last_sequence;
                self.backoff_sleep();
                CycleReport::Failed {
                    error: failure.error,
                }
            }
        }
    }

    /// Current backoff exponent
    pub fn backoff_exponent(&self) -> u8 {
        self.backoff.exponent()
    }

    /// Reception progress the next hello will report
    pub fn last_sequence(&self) -> u8 {
        self.last_sequence
    }

    fn settle_success(&mut self) {
        self.backoff.reset();
        self.persist();
    }

    fn persist(&mut self) {
        self.store.save(&RetainedState {
            backoff_exponent: self.backoff.exponent(),
            last_sequence: self.last_sequence,
        });
    }
}
